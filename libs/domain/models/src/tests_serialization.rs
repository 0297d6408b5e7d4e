// [libs/domain/models/src/tests_serialization.rs]
#[cfg(test)]
mod tests {
    use crate::decision::{Decision, DecisionAction, SponsorTransactionParams};
    use crate::reserve::ReserveState;

    #[test]
    fn sponsor_transaction_round_trips_through_json() {
        let decision = Decision::sponsor_transaction(
            SponsorTransactionParams {
                agent_wallet_address: "a".repeat(40),
                protocol_id: "demo-protocol".into(),
                estimated_cost_usd: 0.3,
                max_gas_units: 200_000,
                target_contract: None,
            },
            0.85,
            "routine sponsorship",
        );

        let raw = serde_json::to_string(&decision).expect("serialize");
        let restored: Decision = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(decision, restored);
        assert!(matches!(restored.action, DecisionAction::SponsorTransaction(_)));
    }

    #[test]
    fn reserve_state_defaults_have_infinite_runway_with_zero_burn() {
        let state = ReserveState::defaults(0.5, 0.05);
        assert_eq!(state.runway_days, f64::INFINITY);
        assert_eq!(state.health_score, 0.0);
        assert!(state.protocol_budgets.is_empty());
    }
}
