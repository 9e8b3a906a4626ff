//! Demo data seed script
//!
//! Seeds the database with a working demo dataset:
//! - 4 users: 1 admin, 1 cook, 2 students
//! - A full weekly menu (7 days × breakfast/lunch) with portion counts
//! - One one-off breakfast payment for today (student "vasya")
//! - One 30-day subscription starting today (student "masha")
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2026! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for all demo accounts (default: Demo2026!)

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

use cafeteria_api::models::meal::subscription_end;

const BREAKFASTS: [&str; 7] = [
    "Omelette, porridge, tea",
    "Syrniki, sour cream, cocoa",
    "Millet porridge, boiled egg, tea",
    "Pancakes, jam, milk",
    "Rice porridge, cheese sandwich, tea",
    "Semolina porridge, apple, compote",
    "Granola, yogurt, tea",
];

const LUNCHES: [&str; 7] = [
    "Borscht, chicken cutlet, mashed potatoes, compote",
    "Pea soup, goulash, buckwheat, bread",
    "Cabbage soup, fish fillet, rice, juice",
    "Noodle soup, meatballs, stewed vegetables, compote",
    "Rassolnik, beef stroganoff, pasta, tea",
    "Mushroom soup, chicken pilaf, salad, juice",
    "Solyanka, baked chicken, potatoes, compote",
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2026!".to_string());

    println!("=== Seed Demo Data ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    println!("Cleaning existing data...");
    sqlx::raw_sql(
        "TRUNCATE users, menu_items, purchase_requests, meal_payments,
         subscriptions, meals_issued, reviews CASCADE",
    )
    .execute(&pool)
    .await?;

    println!("Creating users...");
    let password_hash = bcrypt::hash(&demo_password, 12).context("bcrypt hash failed")?;

    let mut user_ids = Vec::new();
    for (username, role) in [
        ("admin", "admin"),
        ("povar", "cook"),
        ("vasya", "student"),
        ("masha", "student"),
    ] {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&pool)
        .await?;
        user_ids.push((username, id));
        println!("  {username} ({role})");
    }

    println!("Creating weekly menu...");
    for day in 1..=7i32 {
        sqlx::query(
            "INSERT INTO menu_items (day_of_week, meal_type, dishes, price_cents, available_quantity)
             VALUES ($1, 'breakfast', $2, 12000, 60)",
        )
        .bind(day)
        .bind(BREAKFASTS[(day - 1) as usize])
        .execute(&pool)
        .await?;

        sqlx::query(
            "INSERT INTO menu_items (day_of_week, meal_type, dishes, price_cents, available_quantity)
             VALUES ($1, 'lunch', $2, 18000, 60)",
        )
        .bind(day)
        .bind(LUNCHES[(day - 1) as usize])
        .execute(&pool)
        .await?;
    }
    println!("  14 menu slots");

    println!("Recording sample ledger entries...");
    let today = Utc::now().date_naive();
    let vasya = user_ids.iter().find(|(u, _)| *u == "vasya").unwrap().1;
    let masha = user_ids.iter().find(|(u, _)| *u == "masha").unwrap().1;

    sqlx::query("INSERT INTO meal_payments (user_id, date, meal_type) VALUES ($1, $2, 'breakfast')")
        .bind(vasya)
        .bind(today)
        .execute(&pool)
        .await?;
    println!("  vasya: breakfast payment for {today}");

    let end_date = subscription_end(today);
    sqlx::query("INSERT INTO subscriptions (user_id, start_date, end_date) VALUES ($1, $2, $3)")
        .bind(masha)
        .bind(today)
        .bind(end_date)
        .execute(&pool)
        .await?;
    println!("  masha: subscription {today} → {end_date}");

    println!("Done. Demo accounts (password: {demo_password}):");
    println!("  admin, povar, vasya, masha");

    Ok(())
}
