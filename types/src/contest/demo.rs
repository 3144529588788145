use chrono::NaiveDate;

use super::User;

const DEMO_ROSTER: [(u64, &str, &str, u32, u32); 8] = [
    (123_456_789, "@ivan_petrov", "Иван Петров", 5, 15),
    (234_567_890, "@anna_sidorova", "Анна Сидорова", 3, 16),
    (345_678_901, "@dmitry_k", "Дмитрий Козлов", 8, 17),
    (456_789_012, "@elena_m", "Елена Морозова", 2, 18),
    (567_890_123, "@alex_novikov", "Александр Новиков", 4, 19),
    (678_901_234, "@maria_volkova", "Мария Волкова", 1, 20),
    (789_012_345, "", "Сергей Белов", 6, 21),
    (890_123_456, "@olga_kuznetsova", "Ольга Кузнецова", 0, 22),
];

/// Validated sandbox participants for trying out draws.
pub fn demo_users() -> Vec<User> {
    DEMO_ROSTER
        .iter()
        .map(|&(user_id, username, full_name, score, day)| User {
            user_id,
            username: username.to_string(),
            full_name: full_name.to_string(),
            referrer_id: None,
            is_validated: true,
            score,
            join_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default(),
        })
        .collect()
}
