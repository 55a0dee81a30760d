use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub username: String, // 用户名或邮箱
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}
