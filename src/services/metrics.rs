use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec, Counter,
    CounterVec, Gauge, GaugeVec,
};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by status",
        &["status"]
    ).unwrap();

    pub static ref MEAL_PAYMENTS_COUNTER: CounterVec = register_counter_vec!(
        "cafeteria_meal_payments_total",
        "One-off meal payments recorded",
        &["meal_type"]
    ).unwrap();

    pub static ref SUBSCRIPTIONS_COUNTER: Counter = register_counter!(
        "cafeteria_subscriptions_total",
        "Subscriptions purchased"
    ).unwrap();

    pub static ref MEALS_ISSUED_COUNTER: CounterVec = register_counter_vec!(
        "cafeteria_meals_issued_total",
        "Meals handed out",
        &["meal_type"]
    ).unwrap();

    // ── Business gauges (refreshed by the collector) ────────────────────────
    pub static ref USERS_GAUGE: GaugeVec = register_gauge_vec!(
        "cafeteria_users_total",
        "Registered users by role",
        &["role"]
    ).unwrap();

    pub static ref ACTIVE_SUBSCRIPTIONS_GAUGE: Gauge = register_gauge!(
        "cafeteria_active_subscriptions",
        "Subscription windows covering today"
    ).unwrap();

    pub static ref PORTIONS_GAUGE: GaugeVec = register_gauge_vec!(
        "cafeteria_portions_remaining",
        "Remaining menu portions by meal type",
        &["meal_type"]
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        if let Err(e) = collect(&pool).await {
            warn!("Metrics: initial collection failed: {}", e);
        }
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let user_counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT role, COUNT(*)::BIGINT FROM users GROUP BY role")
            .fetch_all(pool)
            .await?;
    for (role, count) in user_counts {
        USERS_GAUGE.with_label_values(&[&role]).set(count as f64);
    }

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM subscriptions
         WHERE start_date <= CURRENT_DATE AND end_date >= CURRENT_DATE",
    )
    .fetch_one(pool)
    .await?;
    ACTIVE_SUBSCRIPTIONS_GAUGE.set(active as f64);

    let portions: Vec<(String, i64)> = sqlx::query_as(
        "SELECT meal_type, COALESCE(SUM(available_quantity), 0)::BIGINT
         FROM menu_items GROUP BY meal_type",
    )
    .fetch_all(pool)
    .await?;
    for (meal_type, count) in portions {
        PORTIONS_GAUGE
            .with_label_values(&[&meal_type])
            .set(count as f64);
    }

    info!("Metrics: business gauges refreshed");
    Ok(())
}
