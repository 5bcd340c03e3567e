#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = load_from_str("{}").unwrap();
        assert_eq!(cfg.common, Context::default());
        assert_eq!(cfg.settings, Settings::default());
        assert!(!cfg.keybinds.is_empty());
        assert!(cfg.tabs.is_empty());
        assert!(cfg.pins.is_empty());
    }

    #[test]
    fn keybinds_parse_with_chords_and_flags() {
        let json = r#"{
            "keybinds": [
                {"id": "up", "trigger": "Shift+D", "command": {"kind": "adjustSpeed", "value": 0.25}},
                {"id": "st", "trigger": "alt+shift+s", "greedy": true,
                 "command": {"kind": "setState", "state": "off"}},
                {"id": "seek", "trigger": "ArrowRight", "ifMedia": true, "enabled": false,
                 "command": {"kind": "seek"}}
            ]
        }"#;
        let cfg = load_from_str(json).unwrap();
        assert_eq!(cfg.keybinds.len(), 3);
        let up = &cfg.keybinds[0];
        assert_eq!(up.trigger.to_string(), "shift+d");
        assert!(up.enabled && !up.greedy && !up.if_media);
        assert_eq!(up.command, Command::AdjustSpeed { value: Some(0.25) });
        assert!(cfg.keybinds[1].greedy);
        assert_eq!(
            cfg.keybinds[1].command,
            Command::SetState { state: Toggle::Off }
        );
        assert!(cfg.keybinds[2].if_media && !cfg.keybinds[2].enabled);
        assert_eq!(cfg.keybinds[2].trigger.key.as_str(), "arrowright");
    }

    #[test]
    fn tabs_and_pins_keyed_by_tab_id() {
        let json = r#"{
            "keybinds": [],
            "tabs": {"7": {"speed": 1.5, "enabled": false}},
            "pins": {"7": {"speed": 2.0}}
        }"#;
        let cfg = load_from_str(json).unwrap();
        assert_eq!(cfg.tabs[&7].speed, Some(1.5));
        assert_eq!(cfg.tabs[&7].enabled, Some(false));
        assert_eq!(cfg.pin(7).and_then(|p| p.layer.speed), Some(2.0));
        assert!(cfg.pin(8).is_none());
    }

    #[test]
    fn unknown_command_reports_location() {
        let json = "{\n  \"keybinds\": [\n    {\"id\": \"x\", \"trigger\": \"x\", \"command\": {\"kind\": \"explode\"}}\n  ]\n}";
        match load_from_str(json) {
            Err(Error::Parse { line, excerpt, .. }) => {
                assert_eq!(line, 3);
                assert!(excerpt.contains("explode"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn bad_trigger_fails_to_parse() {
        let json = r#"{"keybinds": [{"id": "x", "trigger": "hyper+x", "command": {"kind": "nothing"}}]}"#;
        assert!(matches!(load_from_str(json), Err(Error::Parse { .. })));
    }

    #[test]
    fn empty_cycle_fails_validation() {
        let json = r#"{"keybinds": [{"id": "c", "trigger": "c",
            "command": {"kind": "cycleFilterValue", "filter": "invert", "cycle": []}}]}"#;
        assert!(matches!(load_from_str(json), Err(Error::Validation { .. })));
    }

    #[test]
    fn json_roundtrip_preserves_config() {
        let mut cfg = Config::default();
        cfg.tabs.insert(3, ContextLayer {
            speed: Some(2.25),
            ..ContextLayer::default()
        });
        cfg.pins.insert(3, Pin::speed(1.75));
        cfg.keybinds[0].cycle_increment = Some(2);
        let text = to_json_string(&cfg).unwrap();
        let back = load_from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn load_from_missing_path_is_read_error() {
        let p = std::env::temp_dir().join("tabspeed-config-does-not-exist.json");
        let err = load_from_path(&p).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert_eq!(err.path(), Some(p.as_path()));
    }

    #[test]
    fn save_then_load_from_disk() {
        let p = std::env::temp_dir().join(format!("tabspeed-config-{}.json", std::process::id()));
        let cfg = Config::default();
        save_to_path(&cfg, &p).unwrap();
        let back = load_from_path(&p).unwrap();
        let _ = std::fs::remove_file(&p);
        assert_eq!(back, cfg);
    }
}
