//! Property-based tests for theme change notification

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use ribble_themes::{ThemeContextManager, ThemeError, ThemePayload, ThemeRegistry};

const THEMES: [&str; 4] = ["light", "dark", "sepia", "contrast"];

fn registry() -> ThemeRegistry {
    THEMES
        .iter()
        .map(|name| (*name, ThemePayload::new().with("name", *name)))
        .collect()
}

fn theme_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("light".to_string()),
        Just("dark".to_string()),
        Just("sepia".to_string()),
        Just("contrast".to_string()),
        Just("missing".to_string()),
    ]
}

/// Property: subscribers observe exactly the effective changes, in order.
///
/// Repeating the active theme and unknown names never produce a notification.
#[test]
fn prop_notifications_match_effective_changes() {
    proptest!(|(requests in prop::collection::vec(theme_strategy(), 0..40))| {
        let manager = ThemeContextManager::new(registry(), "light").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager
            .on_theme_changed(move |t| sink.lock().unwrap().push(t.name.clone()))
            .unwrap();

        let mut expected = Vec::new();
        let mut current = "light".to_string();
        for request in &requests {
            let result = manager.set_theme(request);
            if THEMES.contains(&request.as_str()) {
                prop_assert!(result.is_ok());
                if *request != current {
                    current = request.clone();
                    expected.push(current.clone());
                }
            } else {
                prop_assert!(matches!(result, Err(ThemeError::UnknownTheme(_))), "unknown theme must fail");
            }
            prop_assert_eq!(manager.current_name(), current.clone());
        }

        prop_assert_eq!(seen.lock().unwrap().clone(), expected);
    });
}

/// Property: every subscriber runs once per change, in registration order.
#[test]
fn prop_subscribers_run_in_registration_order() {
    proptest!(|(count in 1usize..20)| {
        let manager = ThemeContextManager::new(registry(), "light").unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..count {
            let sink = order.clone();
            manager.on_theme_changed(move |_| sink.lock().unwrap().push(i)).unwrap();
        }

        manager.set_theme("dark").unwrap();
        prop_assert_eq!(order.lock().unwrap().clone(), (0..count).collect::<Vec<_>>());
    });
}

/// Property: unsubscribed handles never fire again, whatever the order of removal.
#[test]
fn prop_unsubscribed_never_fire() {
    proptest!(|(removed in prop::collection::vec(any::<bool>(), 1..20))| {
        let manager = ThemeContextManager::new(registry(), "light").unwrap();
        let fired = Arc::new(Mutex::new(Vec::new()));

        let subs: Vec<_> = (0..removed.len())
            .map(|i| {
                let sink = fired.clone();
                manager.on_theme_changed(move |_| sink.lock().unwrap().push(i)).unwrap()
            })
            .collect();

        for (sub, remove) in subs.iter().zip(&removed) {
            if *remove {
                manager.unsubscribe(sub);
                sub.unsubscribe();
            }
        }

        manager.set_theme("sepia").unwrap();
        let expected: Vec<usize> = removed
            .iter()
            .enumerate()
            .filter(|(_, remove)| !**remove)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(fired.lock().unwrap().clone(), expected);
    });
}
