use std::fmt;

/// Failure kinds reported at the registry boundary.
///
/// Store failures never carry raw driver text: the storage layer logs the
/// underlying `DbErr` and hands back a `StoreUnavailable` naming only the
/// operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidUrl(String),
    InvalidCode(String),
    CodeTaken(String),
    GenerationExhausted(String),
    NotFound(String),
    StoreUnavailable(String),
    DatabaseConfig(String),
}

impl RegistryError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::InvalidUrl(_) => "E001",
            RegistryError::InvalidCode(_) => "E002",
            RegistryError::CodeTaken(_) => "E003",
            RegistryError::GenerationExhausted(_) => "E004",
            RegistryError::NotFound(_) => "E005",
            RegistryError::StoreUnavailable(_) => "E006",
            RegistryError::DatabaseConfig(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RegistryError::InvalidUrl(_) => "Invalid URL",
            RegistryError::InvalidCode(_) => "Invalid Short Code",
            RegistryError::CodeTaken(_) => "Short Code Taken",
            RegistryError::GenerationExhausted(_) => "Code Generation Exhausted",
            RegistryError::NotFound(_) => "Link Not Found",
            RegistryError::StoreUnavailable(_) => "Store Unavailable",
            RegistryError::DatabaseConfig(_) => "Database Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RegistryError::InvalidUrl(msg) => msg,
            RegistryError::InvalidCode(msg) => msg,
            RegistryError::CodeTaken(msg) => msg,
            RegistryError::GenerationExhausted(msg) => msg,
            RegistryError::NotFound(msg) => msg,
            RegistryError::StoreUnavailable(msg) => msg,
            RegistryError::DatabaseConfig(msg) => msg,
        }
    }

    /// Whether the caller sent something wrong, as opposed to an
    /// operational failure on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidUrl(_)
                | RegistryError::InvalidCode(_)
                | RegistryError::CodeTaken(_)
                | RegistryError::NotFound(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RegistryError {}

// 便捷的构造函数
impl RegistryError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        RegistryError::InvalidUrl(msg.into())
    }

    pub fn invalid_code<T: Into<String>>(msg: T) -> Self {
        RegistryError::InvalidCode(msg.into())
    }

    pub fn code_taken<T: Into<String>>(msg: T) -> Self {
        RegistryError::CodeTaken(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        RegistryError::GenerationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RegistryError::NotFound(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        RegistryError::StoreUnavailable(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        RegistryError::DatabaseConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
