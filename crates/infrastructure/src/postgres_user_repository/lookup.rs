use super::*;

impl PostgresUserRepository {
    pub(super) async fn exists_by_name_impl(&self, name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to check user name existence: {error}"))
            })
    }

    pub(super) async fn find_by_name_impl(&self, name: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, address
            FROM users
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by name: {error}")))?;

        row.map(User::try_from).transpose()
    }

    pub(super) async fn find_by_id_impl(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, address
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(User::try_from).transpose()
    }

    pub(super) async fn exists_by_id_impl(&self, id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to check user id existence: {error}"))
            })
    }

    pub(super) async fn find_all_impl(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, address
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        rows.into_iter().map(User::try_from).collect()
    }
}
