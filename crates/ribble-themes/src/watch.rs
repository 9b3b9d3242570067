//! Async bridge over theme subscriptions using `tokio::sync::watch`

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{Result, ThemeError},
    manager::{Subscription, ThemeContextManager},
    types::ThemeSnapshot,
};

/// Receives the active theme as a watch channel.
///
/// Seeded with the theme active at creation. Dropping the watch unsubscribes
/// it; disposing the manager closes the channel.
#[derive(Debug)]
pub struct ThemeWatch {
    receiver: watch::Receiver<ThemeSnapshot>,
    subscription: Subscription,
}

impl ThemeWatch {
    /// Latest theme seen by this watch
    pub fn current(&self) -> ThemeSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next effective theme change.
    ///
    /// Fails with [`ThemeError::Disposed`] once the manager is disposed.
    pub async fn changed(&mut self) -> Result<ThemeSnapshot> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ThemeError::Disposed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Another receiver on the same channel
    pub fn receiver(&self) -> watch::Receiver<ThemeSnapshot> {
        self.receiver.clone()
    }
}

impl Drop for ThemeWatch {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl ThemeContextManager {
    /// Observe theme changes from async code
    pub fn watch(&self) -> Result<ThemeWatch> {
        let (sender, receiver) = watch::channel(self.get_theme());
        let sender = Arc::new(sender);

        let notify = sender.clone();
        let subscription = self.on_theme_changed(move |theme| {
            notify.send_replace(theme.clone());
        })?;

        // Catch a switch that landed between seeding and subscribing; read
        // under the channel lock so a newer notification is never replaced
        sender.send_if_modified(|value| {
            let current = self.get_theme();
            if value.same_as(&current) {
                return false;
            }
            *value = current;
            true
        });
        Ok(ThemeWatch {
            receiver,
            subscription,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ThemeRegistry;

    #[tokio::test]
    async fn test_watch_receives_changes() {
        let manager = ThemeContextManager::new(ThemeRegistry::with_defaults(), "light").unwrap();
        let mut watch = manager.watch().unwrap();
        assert_eq!(watch.current().name, "light");

        manager.set_theme("dark").unwrap();
        let theme = watch.changed().await.unwrap();
        assert_eq!(theme.name, "dark");
    }

    #[test]
    fn test_watch_created_during_concurrent_switches_is_current() {
        let manager = ThemeContextManager::new(ThemeRegistry::with_defaults(), "light").unwrap();
        let switcher = manager.clone();
        let worker = std::thread::spawn(move || {
            for i in 0..500 {
                let name = if i % 2 == 0 { "dark" } else { "light" };
                switcher.set_theme(name).unwrap();
            }
        });

        let watches: Vec<ThemeWatch> = (0..200).map(|_| manager.watch().unwrap()).collect();
        worker.join().unwrap();

        let active = manager.get_theme();
        for watch in &watches {
            assert_eq!(watch.current().name, active.name);
        }
    }

    #[tokio::test]
    async fn test_watch_closes_on_dispose() {
        let manager = ThemeContextManager::new(ThemeRegistry::with_defaults(), "light").unwrap();
        let mut watch = manager.watch().unwrap();

        manager.dispose();
        assert!(matches!(watch.changed().await, Err(ThemeError::Disposed)));
    }

    #[test]
    fn test_dropping_watch_unsubscribes() {
        let manager = ThemeContextManager::new(ThemeRegistry::with_defaults(), "light").unwrap();
        let watch = manager.watch().unwrap();
        assert_eq!(manager.subscriber_count(), 1);

        drop(watch);
        assert_eq!(manager.subscriber_count(), 0);
    }
}
