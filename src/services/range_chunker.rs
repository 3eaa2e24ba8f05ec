use crate::models::BlockNumberRange;

/// 把缺口区间切成不超过 batch_size 的批次窗口。
/// 小于批次大小的区间原样输出；批次保持输入区间顺序，不做跨区间合并。
pub fn chunk_ranges(ranges: &[BlockNumberRange], batch_size: u64) -> Vec<BlockNumberRange> {
    let batch_size = batch_size.max(1);
    let mut chunks = Vec::new();

    for range in ranges {
        if range.count() <= batch_size {
            chunks.push(*range);
            continue;
        }
        let mut start = range.start;
        while start <= range.end {
            let end = range.end.min(start + batch_size - 1);
            chunks.push(BlockNumberRange::new(start, end));
            // end 到达 u64 上界时 +1 会回绕，先判断再推进
            if end == range.end {
                break;
            }
            start = end + 1;
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_range_splits_into_windows() {
        // [[100,109]] 按 4 切 → [[100,103],[104,107],[108,109]]
        let chunks = chunk_ranges(&[BlockNumberRange::new(100, 109)], 4);
        assert_eq!(
            chunks,
            vec![
                BlockNumberRange::new(100, 103),
                BlockNumberRange::new(104, 107),
                BlockNumberRange::new(108, 109),
            ]
        );
    }

    #[test]
    fn small_range_passes_through() {
        let input = vec![BlockNumberRange::new(5, 6)];
        assert_eq!(chunk_ranges(&input, 10), input);
    }

    #[test]
    fn input_order_is_preserved_without_merging() {
        let input = vec![
            BlockNumberRange::new(50, 50),
            BlockNumberRange::new(10, 30),
        ];
        let chunks = chunk_ranges(&input, 10);
        assert_eq!(
            chunks,
            vec![
                BlockNumberRange::new(50, 50),
                BlockNumberRange::new(10, 19),
                BlockNumberRange::new(20, 29),
                BlockNumberRange::new(30, 30),
            ]
        );
    }

    #[test]
    fn exact_multiple_has_no_tail() {
        let chunks = chunk_ranges(&[BlockNumberRange::new(0, 7)], 4);
        assert_eq!(
            chunks,
            vec![BlockNumberRange::new(0, 3), BlockNumberRange::new(4, 7)]
        );
    }
}
