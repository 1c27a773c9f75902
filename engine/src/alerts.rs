use std::sync::Arc;

use fleet_core::{
    Alert, AlertId, AlertsPage, AlertsQuery, CoreResult, Event, NewAlert,
    core_error::{NotFoundSnafu, ValidationSnafu},
};
use snafu::{OptionExt, ensure};

use crate::{Storage, SubscriptionBroker};

/// Alert lifecycle service. Creation and status transitions are
/// persisted first, then announced on the broker.
pub struct AlertStore<S> {
    storage: Arc<S>,
    broker: SubscriptionBroker,
}

impl<S> Clone for AlertStore<S> {
    fn clone(&self) -> Self {
        AlertStore {
            storage: self.storage.clone(),
            broker: self.broker.clone(),
        }
    }
}

impl<S: Storage> AlertStore<S> {
    pub fn new(storage: Arc<S>, broker: SubscriptionBroker) -> AlertStore<S> {
        AlertStore { storage, broker }
    }

    pub async fn create(&self, new: NewAlert) -> CoreResult<Alert> {
        ensure!(
            !new.message.trim().is_empty(),
            ValidationSnafu {
                reason: "alert message cannot be empty",
            }
        );
        ensure!(
            !new.affected_asset.trim().is_empty(),
            ValidationSnafu {
                reason: "alert affected asset cannot be empty",
            }
        );

        let alert = Alert::new(new);
        self.storage.add_alert(&alert).await?;
        self.broker
            .publish(Event::Alert {
                data: alert.clone(),
            })
            .await;
        Ok(alert)
    }

    pub async fn acknowledge(&self, id: AlertId, user_id: &str) -> CoreResult<Alert> {
        let mut alert = self.load(id).await?;
        alert.acknowledge(user_id)?;
        self.update(alert).await
    }

    pub async fn resolve(&self, id: AlertId, user_id: &str, resolution: &str) -> CoreResult<Alert> {
        let mut alert = self.load(id).await?;
        alert.resolve(user_id, resolution)?;
        self.update(alert).await
    }

    /// Notes are annotations, they are persisted but not announced.
    pub async fn add_note(&self, id: AlertId, user_id: &str, text: &str) -> CoreResult<Alert> {
        let mut alert = self.load(id).await?;
        alert.add_note(user_id, text);
        self.storage.update_alert(&alert).await?;
        Ok(alert)
    }

    pub async fn alert(&self, id: AlertId) -> CoreResult<Alert> {
        self.load(id).await
    }

    pub async fn alerts(&self, query: &AlertsQuery) -> CoreResult<AlertsPage> {
        self.storage.alerts(query).await
    }

    async fn load(&self, id: AlertId) -> CoreResult<Alert> {
        self.storage.alert(id).await?.context(NotFoundSnafu {
            entity: "alert",
            id: id.to_string(),
        })
    }

    async fn update(&self, alert: Alert) -> CoreResult<Alert> {
        self.storage.update_alert(&alert).await?;
        self.broker
            .publish(Event::AlertUpdated {
                data: alert.clone(),
            })
            .await;
        Ok(alert)
    }
}
