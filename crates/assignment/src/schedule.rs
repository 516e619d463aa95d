use time::{Date, Duration, Weekday};

/// Weekday from its form index, Sunday being 0.
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    let weekday = match index {
        0 => Weekday::Sunday,
        1 => Weekday::Monday,
        2 => Weekday::Tuesday,
        3 => Weekday::Wednesday,
        4 => Weekday::Thursday,
        5 => Weekday::Friday,
        6 => Weekday::Saturday,
        _ => return None,
    };

    Some(weekday)
}

pub fn weekday_index(weekday: Weekday) -> i64 {
    weekday.number_days_from_sunday() as i64
}

/// First date strictly after `from` that falls on `target`.
/// When `from` is already a `target` day the result is one week later.
pub fn next_occurrence(target: Weekday, from: Date) -> Date {
    let diff = (weekday_index(target) - weekday_index(from.weekday()) + 7) % 7;
    let diff = if diff == 0 { 7 } else { diff };

    from + Duration::days(diff)
}

/// `repeat_count` weekly dates starting at `next_occurrence(target, from)`.
pub fn generate_series(target: Weekday, repeat_count: u32, from: Date) -> Vec<Date> {
    let start = next_occurrence(target, from);

    (0..repeat_count)
        .map(|week| start + Duration::weeks(week as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    #[test]
    fn test_next_occurrence_from_wednesday() {
        let wednesday = date!(2024 - 01 - 03);

        assert_eq!(
            next_occurrence(Weekday::Monday, wednesday),
            date!(2024 - 01 - 08)
        );
        assert_eq!(
            next_occurrence(Weekday::Thursday, wednesday),
            date!(2024 - 01 - 04)
        );
        assert_eq!(
            next_occurrence(Weekday::Sunday, wednesday),
            date!(2024 - 01 - 07)
        );
    }

    #[test]
    fn test_next_occurrence_same_weekday_is_next_week() {
        let wednesday = date!(2024 - 01 - 03);

        assert_eq!(
            next_occurrence(Weekday::Wednesday, wednesday),
            date!(2024 - 01 - 10)
        );

        for offset in 0..14 {
            let day = date!(2024 - 02 - 26) + Duration::days(offset);
            assert_eq!(next_occurrence(day.weekday(), day), day + Duration::days(7));
        }
    }

    #[test]
    fn test_next_occurrence_is_earliest_match() {
        // crosses a leap day and a year boundary
        for start in [date!(2024 - 02 - 26), date!(2025 - 12 - 27)] {
            for offset in 0..14 {
                let day = start + Duration::days(offset);
                for target in WEEKDAYS {
                    if target == day.weekday() {
                        continue;
                    }

                    let next = next_occurrence(target, day);
                    assert!(next > day);
                    assert_eq!(next.weekday(), target);
                    assert!((next - day).whole_days() < 7);
                }
            }
        }
    }

    #[test]
    fn test_generate_series_four_mondays() {
        assert_eq!(
            generate_series(Weekday::Monday, 4, date!(2024 - 01 - 03)),
            vec![
                date!(2024 - 01 - 08),
                date!(2024 - 01 - 15),
                date!(2024 - 01 - 22),
                date!(2024 - 01 - 29),
            ]
        );
    }

    #[test]
    fn test_generate_series_shape() {
        let today = date!(2024 - 12 - 30);

        for target in WEEKDAYS {
            for count in [1, 2, 4, 8, 12, 26, 52] {
                let series = generate_series(target, count, today);

                assert_eq!(series.len(), count as usize);
                assert_eq!(series[0], next_occurrence(target, today));
                assert!(series.iter().all(|d| d.weekday() == target));
                assert!(
                    series
                        .windows(2)
                        .all(|w| w[1] - w[0] == Duration::days(7))
                );
            }
        }
    }

    #[test]
    fn test_generate_series_empty() {
        assert!(generate_series(Weekday::Friday, 0, date!(2024 - 01 - 03)).is_empty());
    }

    #[test]
    fn test_weekday_index() {
        for (index, weekday) in WEEKDAYS.iter().enumerate() {
            assert_eq!(weekday_from_index(index as i64), Some(*weekday));
            assert_eq!(weekday_index(*weekday), index as i64);
        }

        assert_eq!(weekday_from_index(-1), None);
        assert_eq!(weekday_from_index(7), None);
    }
}
