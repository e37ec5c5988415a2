/// 生成会话/重置令牌：32 字节随机数的十六进制表示
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// 生成初始管理员密码，满足密码策略
pub fn generate_password() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    let body: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("Aa1{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_generated_password_passes_policy() {
        let password = generate_password();
        assert!(crate::utils::validate::validate_password(&password).is_valid);
    }
}
