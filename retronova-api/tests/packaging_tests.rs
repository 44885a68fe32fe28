//! Checks on the container artifacts shipped at the repository root

const COMPOSE: &str = include_str!("../../docker-compose.yml");
const DOCKERFILE: &str = include_str!("../../Dockerfile");
const SAMPLE_CONFIG: &str = include_str!("../retronova.toml");
const SCHEMA: &str = include_str!("../migrations/20250101000000_initial_schema.sql");

#[test]
fn test_app_waits_for_healthy_database() {
    assert!(COMPOSE.contains("condition: service_healthy"));
    assert!(COMPOSE.contains("pg_isready"));
    assert!(COMPOSE.contains("retries: 5"));
}

#[test]
fn test_ports_and_volume() {
    assert!(COMPOSE.contains("\"8000:8000\""));
    assert!(COMPOSE.contains("\"5432:5432\""));
    assert!(COMPOSE.contains("postgres_data:/var/lib/postgresql/data"));
    assert!(DOCKERFILE.contains("EXPOSE 8000"));
}

#[test]
fn test_database_url_points_at_db_service() {
    let line = COMPOSE
        .lines()
        .find(|line| line.trim_start().starts_with("DATABASE_URL:"))
        .expect("app service sets DATABASE_URL");
    assert!(line.contains("@db:5432/"));
}

#[test]
fn test_sample_config_is_valid() {
    let config: retronova_api::AppConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
    assert_eq!(config.api.bind_address, "0.0.0.0:8000");
    assert!(config.validate_all(false).is_ok());
}

#[test]
fn test_schema_checks_amounts_and_promo_limits() {
    assert!(SCHEMA.contains("CHECK (amount >= 0 AND nb_ticket >= 0)"));
    assert!(SCHEMA.contains("CHECK (nb_parties >= 1)"));
    assert!(SCHEMA.contains("CHECK (max_uses IS NULL OR max_uses >= 1)"));
}
