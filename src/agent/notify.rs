use crate::models::{NotificationChannel, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Non-fatal notification failure
#[derive(Debug, Error)]
#[error("notification via {channel:?} to {user_id} failed: {message}")]
pub struct NotificationError {
    pub channel: NotificationChannel,
    pub user_id: String,
    pub message: String,
}

/// A single delivery channel (email, SMS, push)
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> NotificationChannel;

    async fn send(&self, user: &User, message: &str) -> Result<(), NotificationError>;
}

macro_rules! simulated_notifier {
    ($name:ident, $channel:expr, $label:literal) => {
        #[derive(Debug, Default)]
        pub struct $name;

        #[async_trait]
        impl Notifier for $name {
            fn channel(&self) -> NotificationChannel {
                $channel
            }

            async fn send(&self, user: &User, message: &str) -> Result<(), NotificationError> {
                tracing::info!("[{}] to {} ({}): {}", $label, user.name, user.id, message);
                Ok(())
            }
        }
    };
}

simulated_notifier!(EmailNotifier, NotificationChannel::Email, "email");
simulated_notifier!(SmsNotifier, NotificationChannel::Sms, "sms");
simulated_notifier!(PushNotifier, NotificationChannel::Push, "push");

/// Routes booking messages to each user's preferred channel
///
/// Delivery is best-effort: a failed send is retried once, then logged
/// and dropped. Notification problems never affect booking state.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn simulated() -> Self {
        Self::new(vec![
            Arc::new(EmailNotifier),
            Arc::new(SmsNotifier),
            Arc::new(PushNotifier),
        ])
    }

    fn notifier_for(&self, channel: NotificationChannel) -> Option<&Arc<dyn Notifier>> {
        self.notifiers.iter().find(|n| n.channel() == channel)
    }

    /// Send to one user on their preferred channel, retrying once
    pub async fn notify(&self, user: &User, message: &str) -> Result<(), NotificationError> {
        let notifier = match self.notifier_for(user.preferred_channel) {
            Some(n) => n,
            None => {
                return Err(NotificationError {
                    channel: user.preferred_channel,
                    user_id: user.id.clone(),
                    message: "no notifier registered for channel".to_string(),
                });
            }
        };

        match notifier.send(user, message).await {
            Ok(()) => Ok(()),
            Err(first) => {
                tracing::warn!("Retrying notification after failure: {}", first);
                notifier.send(user, message).await
            }
        }
    }

    /// Notify every member of a party, returning how many sends failed
    /// after the retry
    pub async fn notify_party(&self, users: &[User], message: &str) -> usize {
        let mut failures = 0;
        for user in users {
            if let Err(e) = self.notify(user, message).await {
                tracing::warn!("Dropping notification after retry: {}", e);
                failures += 1;
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceTier;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn user(id: &str, channel: NotificationChannel) -> User {
        User {
            id: id.to_string(),
            name: format!("User {}", id),
            latitude: 40.7580,
            longitude: -73.9855,
            interests: vec![],
            price_tier: PriceTier::Moderate,
            viewing_history: HashMap::new(),
            preferred_channel: channel,
        }
    }

    struct FlakyNotifier {
        channel: NotificationChannel,
        attempts: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl Notifier for FlakyNotifier {
        fn channel(&self) -> NotificationChannel {
            self.channel
        }

        async fn send(&self, user: &User, _message: &str) -> Result<(), NotificationError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && attempt == 0 {
                Err(NotificationError {
                    channel: self.channel,
                    user_id: user.id.clone(),
                    message: "simulated outage".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_routes_to_preferred_channel() {
        let dispatcher = NotificationDispatcher::simulated();
        let failures = dispatcher
            .notify_party(
                &[
                    user("u1", NotificationChannel::Email),
                    user("u2", NotificationChannel::Sms),
                    user("u3", NotificationChannel::Push),
                ],
                "Booking confirmed",
            )
            .await;
        assert_eq!(failures, 0);
    }

    #[tokio::test]
    async fn test_retries_once_then_succeeds() {
        let flaky = Arc::new(FlakyNotifier {
            channel: NotificationChannel::Email,
            attempts: AtomicUsize::new(0),
            fail_first: true,
        });
        let dispatcher = NotificationDispatcher::new(vec![flaky.clone()]);

        let result = dispatcher
            .notify(&user("u1", NotificationChannel::Email), "hello")
            .await;

        assert!(result.is_ok());
        assert_eq!(flaky.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_channel_is_reported() {
        let dispatcher = NotificationDispatcher::new(vec![Arc::new(EmailNotifier)]);
        let result = dispatcher
            .notify(&user("u1", NotificationChannel::Push), "hello")
            .await;
        assert!(result.is_err());
    }
}
