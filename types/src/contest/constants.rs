/// Identity allowed to run administrative actions unless configured otherwise.
pub const DEFAULT_ADMIN_ID: u64 = 988_720_538;

/// Channel participants must subscribe to.
pub const CHANNEL_ID: &str = "@samuraichert";

/// Bot deep-link base used for referral links unless configured otherwise.
pub const DEFAULT_BOT_ENTRY_POINT: &str = "https://t.me/YourBotName";

/// Prefix of the `start` parameter carried by referral deep links.
pub const REFERRAL_START_PREFIX: &str = "ref_";

/// Length of a generated referral code.
pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Symbols a referral code is drawn from (62 symbols, mixed case).
pub const REFERRAL_CODE_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Default "how it works" text shown to participants.
pub const DEFAULT_HOWTO: &str = "🎁 <b>Как участвовать в розыгрыше:</b>\n\n\
1️⃣ Подпишитесь на канал @samuraichert\n\
2️⃣ Нажмите кнопку \"Проверить подписку\"\n\
3️⃣ Пригласите друзей по своей реферальной ссылке\n\
4️⃣ За каждого друга получите +1 балл\n\n\
🏆 Чем больше баллов, тем выше шанс победить!";
