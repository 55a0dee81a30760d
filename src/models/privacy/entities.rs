use super::responses::DeleteUserDataResult;

/// 删除用户数据后需要重新评分的 (活动, 用户)
#[derive(Debug, Default)]
pub struct UserDataDeletion {
    pub result: DeleteUserDataResult,
    pub affected: Vec<(i64, i64)>,
}
