use ubl_core::{update, BanListState, Msg};

#[test]
fn update_is_noop() {
    let state = BanListState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn commands_are_ignored_before_start() {
    for msg in [
        Msg::RefreshRequested,
        Msg::ReloadRequested,
        Msg::ConfigReloaded { auto_refresh: None },
        Msg::ShutdownRequested,
    ] {
        let state = BanListState::new();
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}
