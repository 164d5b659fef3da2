use sqlx::{PgPool, Row};

use crate::models::AdminUser;

pub const ADMIN_ROLE: &str = "admin";

pub async fn fetch_admins(pool: &PgPool) -> anyhow::Result<Vec<AdminUser>> {
    let rows = sqlx::query(
        r#"
        SELECT email, name, is_active, created_at
        FROM users
        WHERE role = $1
        ORDER BY created_at
        "#,
    )
    .bind(ADMIN_ROLE)
    .fetch_all(pool)
    .await?;

    let mut admins = Vec::with_capacity(rows.len());

    for row in rows {
        admins.push(AdminUser {
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        });
    }

    Ok(admins)
}
