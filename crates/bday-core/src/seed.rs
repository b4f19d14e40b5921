use chrono::NaiveDate;

use crate::model::BirthdayRecord;

/// First-run roster. The year 2000 is a placeholder.
const SEED: [(&str, u32, u32); 6] = [
    ("Argha", 11, 9),
    ("Biki", 1, 2),
    ("Bishwashree", 10, 12),
    ("Biswajyoti", 5, 12),
    ("Iqram", 7, 31),
    ("Uddipan", 7, 4),
];

const SEED_YEAR: i32 = 2000;

/// The fixed seed list used when no usable stored roster exists.
#[must_use]
pub fn seed_records() -> Vec<BirthdayRecord> {
    SEED.iter()
        .filter_map(|&(name, month, day)| {
            NaiveDate::from_ymd_opt(SEED_YEAR, month, day).map(|date| BirthdayRecord::new(name, date))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_six_distinct_names() {
        let seed = seed_records();
        assert_eq!(seed.len(), 6);
        let names: HashSet<_> = seed.iter().map(BirthdayRecord::name_key).collect();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn seed_keeps_declared_order() {
        let names: Vec<_> = seed_records().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["Argha", "Biki", "Bishwashree", "Biswajyoti", "Iqram", "Uddipan"]
        );
    }
}
