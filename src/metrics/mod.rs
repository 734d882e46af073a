use prometheus::{IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_ROUNDS: IntGauge =
        IntGauge::new("noggin_active_rounds", "Active ongoing rounds").expect("metric cannot be created");
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ACTIVE_ROUNDS.clone()))
        .expect("collector cannot be registered");
}

#[cfg(test)]
mod tests {
    use super::{register_metrics, ACTIVE_ROUNDS, REGISTRY};

    #[test]
    fn active_rounds_gauge_is_registered() {
        register_metrics();
        ACTIVE_ROUNDS.inc();

        let families = REGISTRY.gather();

        assert!(families
            .iter()
            .any(|family| family.get_name() == "noggin_active_rounds"));
        ACTIVE_ROUNDS.dec();
    }
}
