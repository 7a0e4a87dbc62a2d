/* User-facing texts shared across handlers. */

pub const MAINTENANCE_MESSAGE: &str = "Bot is under maintenance. Please try again later.";
pub const NO_PERMISSION_MESSAGE: &str = "Anda tidak memiliki izin untuk menggunakan perintah ini.";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found in database";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Terjadi kesalahan, silakan coba lagi nanti.";
pub const WORLD_LOCK_EMOJI: &str = "🔒";
