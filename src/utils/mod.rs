pub mod ip;
pub mod url_validator;

/// 生成短码使用的字符集
pub const SHORT_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 查询时接受的最大短码长度
pub const MAX_SHORT_CODE_LENGTH: usize = 32;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 每个字符独立均匀地从字母表中选取
    iter::repeat_with(|| {
        SHORT_CODE_ALPHABET[rand::random_range(0..SHORT_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 与固定路由冲突的短码，分配时跳过
pub const RESERVED_SHORT_CODES: &[&str] = &["api", "test", "health"];

pub fn is_reserved_short_code(code: &str) -> bool {
    RESERVED_SHORT_CODES.contains(&code)
}

/// 检查短码格式：只允许小写字母和数字
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LENGTH
        && code.bytes().all(|b| SHORT_CODE_ALPHABET.contains(&b))
}
