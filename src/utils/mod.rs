pub mod url_validator;

/// 短码最短长度
pub const MIN_CODE_LENGTH: usize = 6;
/// 短码最长长度
pub const MAX_CODE_LENGTH: usize = 8;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random code of exactly `length` characters from `[A-Za-z0-9]`.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_CHARSET[rand::random_range(0..CODE_CHARSET.len())] as char)
        .take(length)
        .collect()
}

/// `^[A-Za-z0-9]{6,8}$`
///
/// The single gate for both generated and user-supplied codes.
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 被其他路由占用的短码，分配出去也无法重定向
pub const RESERVED_CODES: &[&str] = &["healthz"];

#[inline]
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
