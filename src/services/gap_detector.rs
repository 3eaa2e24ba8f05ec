use crate::models::BlockNumberRange;

/// 计算 [first, last]（顺序无关）内缺失的区块号，
/// 并在一次从左到右的扫描中合并成连续闭区间。
/// `existing` 为库中已有规范行的区块号，要求升序（SQL 端已排序）。
/// 无缺失时返回空列表。
pub fn missing_ranges(first: u64, last: u64, existing: &[i64]) -> Vec<BlockNumberRange> {
    let span = BlockNumberRange::new(first, last);

    let mut gaps: Vec<BlockNumberRange> = Vec::new();
    let mut current: Option<(u64, u64)> = None;
    let mut cursor = 0usize;

    for number in span.start..=span.end {
        // 指针推进到 >= number 的第一个已有值
        while cursor < existing.len() && (existing[cursor] as u64) < number {
            cursor += 1;
        }
        let present = cursor < existing.len() && existing[cursor] as u64 == number;

        if present {
            // 已有行：结算当前缺口
            if let Some((start, end)) = current.take() {
                gaps.push(BlockNumberRange::new(start, end));
            }
        } else {
            // 缺失：与上一个缺失相邻则延长区间，否则开新区间
            current = match current {
                Some((start, _)) => Some((start, number)),
                None => Some((number, number)),
            };
        }
    }
    if let Some((start, end)) = current {
        gaps.push(BlockNumberRange::new(start, end));
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holes_coalesce_into_closed_ranges() {
        // 已有 {100,101,104,105}，查询 [100,106] → [[102,103],[106,106]]
        let existing = vec![100, 101, 104, 105];
        assert_eq!(
            missing_ranges(100, 106, &existing),
            vec![
                BlockNumberRange::new(102, 103),
                BlockNumberRange::new(106, 106),
            ]
        );
    }

    #[test]
    fn complete_span_yields_no_gaps() {
        let existing = vec![5, 6, 7];
        assert!(missing_ranges(5, 7, &existing).is_empty());
    }

    #[test]
    fn empty_store_yields_whole_span() {
        assert_eq!(
            missing_ranges(10, 12, &[]),
            vec![BlockNumberRange::new(10, 12)]
        );
    }

    #[test]
    fn bounds_are_order_independent() {
        let existing = vec![11];
        assert_eq!(
            missing_ranges(12, 10, &existing),
            vec![
                BlockNumberRange::new(10, 10),
                BlockNumberRange::new(12, 12),
            ]
        );
    }

    #[test]
    fn single_block_span() {
        assert_eq!(
            missing_ranges(42, 42, &[]),
            vec![BlockNumberRange::new(42, 42)]
        );
        assert!(missing_ranges(42, 42, &[42]).is_empty());
    }
}
