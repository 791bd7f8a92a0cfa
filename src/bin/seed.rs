use axum_storefront_api::{config::AppConfig, db::create_pool, middleware::auth::Claims};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let customer_id = ensure_user(&pool, "user@example.com", "customer").await?;
    let admin_id = ensure_user(&pool, "admin@example.com", "admin").await?;
    ensure_default_address(&pool, customer_id).await?;
    seed_shipping_methods(&pool).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Customer ID: {customer_id}, Admin ID: {admin_id}");
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        println!("Customer token: {}", dev_token(&secret, customer_id, "customer")?);
        println!("Admin token: {}", dev_token(&secret, admin_id, "admin")?);
    }
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, role: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(row.0)
}

async fn ensure_default_address(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM addresses WHERE user_id = $1 LIMIT 1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO addresses
            (id, user_id, full_name, line1, city, state, postal_code, country, phone, is_default)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind("Seed Customer")
    .bind("123 Market St")
    .bind("San Francisco")
    .bind("CA")
    .bind("94105")
    .bind("USA")
    .bind("+1 555-000-1234")
    .execute(pool)
    .await?;

    println!("Seeded default address");
    Ok(())
}

async fn seed_shipping_methods(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let methods = vec![
        ("Standard", "Delivers in 5-7 business days", 700_i64, 7),
        ("Express", "Priority shipping in 2-3 days", 1500, 3),
        ("Next Day", "Arrives the next business day", 2500, 1),
    ];

    for (name, desc, rate, days) in methods {
        sqlx::query(
            r#"
            INSERT INTO shipping_methods (id, name, description, rate, estimated_days)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(rate)
        .bind(days)
        .execute(pool)
        .await?;
    }

    println!("Seeded shipping methods");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Canvas Sneaker", "Everyday low-top sneaker", 5500_i64),
        ("Leather Tote", "Full-grain leather tote bag", 12900),
        ("Field Watch", "38mm quartz field watch", 18900),
        ("Wool Beanie", "Merino wool beanie", 2400),
    ];

    for (index, (title, desc, price)) in products.into_iter().enumerate() {
        let images = serde_json::json!([
            format!("https://picsum.photos/seed/shop-{index}/600/600"),
        ]);
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, price, currency, images)
            VALUES ($1, $2, $3, $4, 'usd', $5)
            ON CONFLICT (title) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(desc)
        .bind(price)
        .bind(images)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

fn dev_token(secret: &str, user_id: Uuid, role: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (chrono::Utc::now().timestamp() + 60 * 60 * 24 * 30) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
