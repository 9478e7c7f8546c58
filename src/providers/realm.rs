//! Realm Query Facade
//!
//! One evaluation expression per logical read. The facade only moves text;
//! turning that text into records is the job of `core::mappers`.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::models::errors::AppResult;
use crate::utils::constants::{
    EXPR_APPLICATIONS, EXPR_BOUNTY, EXPR_BOUNTY_COUNT, EXPR_LEADERBOARD, EXPR_VALIDATORS,
};

/// Anything that can evaluate an expression against the realm
#[async_trait]
pub trait RealmQuery: Send + Sync {
    async fn eval(&self, expression: &str) -> AppResult<String>;
}

pub fn get_bounty_expr(id: u64) -> String {
    format!("{}({})", EXPR_BOUNTY, id)
}

pub fn applications_expr(bounty_id: u64) -> String {
    format!("{}({})", EXPR_APPLICATIONS, bounty_id)
}

pub fn validators_expr(application_id: u64) -> String {
    format!("{}({})", EXPR_VALIDATORS, application_id)
}

/// The five read operations the gateway needs
#[derive(Clone)]
pub struct RealmFacade {
    query: Arc<dyn RealmQuery>,
}

impl RealmFacade {
    pub fn new(query: Arc<dyn RealmQuery>) -> Self {
        Self { query }
    }

    async fn eval(&self, expression: &str) -> AppResult<String> {
        let text = self.query.eval(expression).await?;
        debug!(expression, reply = %text, "Realm reply");
        Ok(text)
    }

    /// `(N uint64)`
    pub async fn count(&self) -> AppResult<String> {
        self.eval(EXPR_BOUNTY_COUNT).await
    }

    /// One struct, or a reply containing `nil` when the id is unknown
    pub async fn get_by_id(&self, id: u64) -> AppResult<String> {
        self.eval(&get_bounty_expr(id)).await
    }

    pub async fn list_applications(&self, bounty_id: u64) -> AppResult<String> {
        self.eval(&applications_expr(bounty_id)).await
    }

    pub async fn list_validators(&self, application_id: u64) -> AppResult<String> {
        self.eval(&validators_expr(application_id)).await
    }

    pub async fn list_leaderboard(&self) -> AppResult<String> {
        self.eval(EXPR_LEADERBOARD).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RealmQuery for Recorder {
        async fn eval(&self, expression: &str) -> AppResult<String> {
            self.seen.lock().unwrap().push(expression.to_string());
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_expressions() {
        let recorder = Arc::new(Recorder::default());
        let facade = RealmFacade::new(recorder.clone());

        facade.count().await.unwrap();
        facade.get_by_id(4).await.unwrap();
        facade.list_applications(4).await.unwrap();
        facade.list_validators(9).await.unwrap();
        facade.list_leaderboard().await.unwrap();

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![
                "GetBountyCount()",
                "GetBounty(4)",
                "GetApplicationsForBounty(4)",
                "GetValidatorsForApplication(9)",
                "GetLeaderboard()",
            ]
        );
    }
}
