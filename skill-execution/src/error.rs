use thiserror::Error;

/// 技能執行錯誤
///
/// `UnknownPattern`、`MissingTemplate`、`InvalidEmitter` 屬於設定錯誤，
/// 遇到時只記錄並略過該次生成，不影響整個施法流程
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("未知的碰撞體類型: {0}")]
    UnknownPattern(String),

    #[error("找不到技能碰撞體模板: {0}")]
    MissingTemplate(String),

    #[error("發射器設定無效 ({item}): {reason}")]
    InvalidEmitter { item: String, reason: String },

    #[error("讀取設定檔失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML 解析失敗: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON 解析失敗: {0}")]
    Json(#[from] serde_json::Error),

    #[error("不支援的檔案格式: {0}")]
    UnsupportedFormat(String),
}

impl SkillError {
    /// 是否為技能設定資料造成的錯誤
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SkillError::UnknownPattern(_)
                | SkillError::MissingTemplate(_)
                | SkillError::InvalidEmitter { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
