use super::*;

impl PostgresUserRepository {
    pub(super) async fn insert_impl(&self, draft: &UserDraft) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, address)
            VALUES ($1, $2)
            RETURNING id, name, address
            "#,
        )
        .bind(draft.name.as_str())
        .bind(draft.address.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "insert user"))?;

        User::try_from(row)
    }

    pub(super) async fn update_impl(&self, id: UserId, draft: &UserDraft) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, address = $3
            WHERE id = $1
            RETURNING id, name, address
            "#,
        )
        .bind(id.as_i64())
        .bind(draft.name.as_str())
        .bind(draft.address.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| name_conflict_or_internal(error, "update user"))?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("user not found with id: {id}")))
    }

    pub(super) async fn delete_by_id_impl(&self, id: UserId) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(())
    }
}
