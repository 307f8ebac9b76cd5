use crate::mappings::PositionMapping;

/// Finds the mapping closest to the given generated `line`/`column` (both 1-based).
///
/// `mappings` has to be in the order produced by [`parse_mappings`](crate::parse_mappings).
/// Mappings on the same line that start at or before `column` win, the closest
/// one being preferred. When the line itself has no such mapping, a mapping from
/// the nearest earlier line is returned, regardless of its column.
pub fn find_closest_mapping(
    mappings: &[PositionMapping],
    line: u32,
    column: u32,
) -> Option<&PositionMapping> {
    let mut closest: Option<&PositionMapping> = None;
    let mut closest_distance = u32::MAX as u64 + 1;

    for mapping in mappings {
        if mapping.generated_line > line {
            break;
        }

        if mapping.generated_line == line && mapping.generated_column <= column {
            let distance = (column - mapping.generated_column) as u64;
            if distance < closest_distance {
                closest = Some(mapping);
                closest_distance = distance;
            }
        } else if mapping.generated_line < line {
            let is_closer_line =
                closest.map_or(true, |best| mapping.generated_line > best.generated_line);
            if is_closer_line {
                closest = Some(mapping);
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(generated_line: u32, generated_column: u32) -> PositionMapping {
        PositionMapping {
            generated_line,
            generated_column,
            original: None,
        }
    }

    fn find(mappings: &[PositionMapping], line: u32, column: u32) -> Option<(u32, u32)> {
        find_closest_mapping(mappings, line, column)
            .map(|m| (m.generated_line, m.generated_column))
    }

    #[test]
    fn prefers_nearest_column_on_the_same_line() {
        let mappings = [m(1, 1), m(1, 11), m(1, 21)];
        assert_eq!(find(&mappings, 1, 1), Some((1, 1)));
        assert_eq!(find(&mappings, 1, 10), Some((1, 1)));
        assert_eq!(find(&mappings, 1, 11), Some((1, 11)));
        assert_eq!(find(&mappings, 1, 500), Some((1, 21)));
    }

    #[test]
    fn falls_back_to_earlier_line() {
        let mappings = [m(1, 1), m(1, 11), m(2, 1), m(4, 5)];
        // line 3 has no mappings: the first mapping of the closest earlier line wins
        assert_eq!(find(&mappings, 3, 7), Some((2, 1)));
        // all the mappings on line 4 start after the queried column
        assert_eq!(find(&mappings, 4, 1), Some((2, 1)));
        assert_eq!(find(&mappings, 9, 1), Some((4, 5)));
    }

    #[test]
    fn earlier_line_keeps_first_mapping() {
        let mappings = [m(1, 1), m(1, 11), m(1, 21)];
        assert_eq!(find(&mappings, 2, 30), Some((1, 1)));
    }

    #[test]
    fn same_line_replaces_earlier_line() {
        let mappings = [m(1, 30), m(2, 3)];
        assert_eq!(find(&mappings, 2, 4), Some((2, 3)));
    }

    #[test]
    fn nothing_before_the_first_mapping() {
        let mappings = [m(2, 1), m(3, 1)];
        assert_eq!(find(&mappings, 1, 100), None);
        assert_eq!(find(&[m(1, 5)], 1, 4), None);
        assert_eq!(find(&[], 1, 1), None);
    }
}
