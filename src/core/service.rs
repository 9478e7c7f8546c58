//! Bounty service
//!
//! Sequences realm round trips for each HTTP operation and hands the replies
//! to the mappers. All calls are strictly sequential; nothing is shared
//! between requests.

use tracing::{debug, info, warn};

use super::mappers::{
    is_not_found, map_applications, map_bounty, map_count, map_leaderboard, map_validators,
};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{
    numeric_id, ApplicationStatus, Bounty, BountyApplication, LeaderboardEntry, UserApplication,
};
use crate::providers::realm::RealmFacade;

#[derive(Clone)]
pub struct BountyService {
    realm: RealmFacade,
}

impl BountyService {
    pub fn new(realm: RealmFacade) -> Self {
        Self { realm }
    }

    /// Number of bounties the realm reports
    pub async fn count(&self) -> AppResult<u64> {
        let reply = self
            .realm
            .count()
            .await
            .map_err(|e| AppError::new(e.code, format!("failed to get count: {}", e.message)))?;
        Ok(map_count(&reply))
    }

    /// One bounty, or `REALM_NOT_FOUND` when the realm answers with `nil`
    pub async fn get_bounty(&self, id: u64) -> AppResult<Bounty> {
        let reply = self.realm.get_by_id(id).await?;
        if is_not_found(&reply) {
            return Err(AppError::realm_not_found("bounty not found"));
        }
        Ok(map_bounty(&id.to_string(), &reply))
    }

    /// Count, then every id in 1..=count in order. A bounty that fails to
    /// load is logged and left out.
    pub async fn list_bounties(&self) -> AppResult<Vec<Bounty>> {
        let count = self.count().await?;
        let mut bounties = Vec::new();

        for id in 1..=count {
            match self.get_bounty(id).await {
                Ok(bounty) => bounties.push(bounty),
                Err(e) => warn!(bounty_id = id, error = %e, "Failed to get bounty"),
            }
        }

        info!(count, returned = bounties.len(), "Bounties listed");
        Ok(bounties)
    }

    /// Applications for one bounty; pending ones get their validators
    pub async fn list_applications(&self, bounty_id: u64) -> AppResult<Vec<BountyApplication>> {
        let mut applications = self.fetch_applications(bounty_id).await?;

        for app in applications
            .iter_mut()
            .filter(|a| a.status == ApplicationStatus::Pending)
        {
            app.validators = self.validators_for(&app.id).await;
        }

        Ok(applications)
    }

    async fn fetch_applications(&self, bounty_id: u64) -> AppResult<Vec<BountyApplication>> {
        let reply = self.realm.list_applications(bounty_id).await?;
        let applications = map_applications(&bounty_id.to_string(), &reply);
        debug!(bounty_id, parsed = applications.len(), "Applications parsed");
        Ok(applications)
    }

    /// Best effort: any failure is an empty list
    async fn validators_for(&self, application_id: &str) -> Vec<String> {
        let Ok(id) = application_id.parse::<u64>() else {
            return Vec::new();
        };

        match self.realm.list_validators(id).await {
            Ok(reply) => map_validators(&reply),
            Err(e) => {
                warn!(application_id = id, error = %e, "Failed to fetch validators");
                Vec::new()
            }
        }
    }

    pub async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>> {
        let reply = self
            .realm
            .list_leaderboard()
            .await
            .map_err(|e| {
                AppError::new(e.code, format!("failed to get leaderboard: {}", e.message))
            })?;
        Ok(map_leaderboard(&reply))
    }

    /// Bounties created by `address`, highest id first
    pub async fn user_bounties(&self, address: &str) -> AppResult<Vec<Bounty>> {
        let mut bounties: Vec<Bounty> = self
            .list_bounties()
            .await?
            .into_iter()
            .filter(|b| b.creator == address)
            .collect();
        bounties.sort_by_key(|b| std::cmp::Reverse(numeric_id(&b.id)));
        Ok(bounties)
    }

    /// Applications submitted by `address` across all bounties, highest id
    /// first, each tagged with its bounty's title and amount
    pub async fn user_applications(&self, address: &str) -> AppResult<Vec<UserApplication>> {
        let count = self.count().await?;
        let mut views = Vec::new();

        for bounty_id in 1..=count {
            let applications = match self.fetch_applications(bounty_id).await {
                Ok(apps) => apps,
                Err(e) => {
                    warn!(bounty_id, error = %e, "Failed to fetch applications");
                    continue;
                }
            };

            let mine: Vec<BountyApplication> = applications
                .into_iter()
                .filter(|a| a.applicant == address)
                .collect();
            if mine.is_empty() {
                continue;
            }

            let (title, amount) = match self.get_bounty(bounty_id).await {
                Ok(bounty) => (bounty.title, bounty.amount),
                Err(e) => {
                    warn!(bounty_id, error = %e, "Failed to fetch bounty for applications");
                    (format!("Bounty #{}", bounty_id), "0".to_string())
                }
            };

            views.extend(mine.into_iter().map(|application| UserApplication {
                application,
                bounty_title: title.clone(),
                bounty_amount: amount.clone(),
            }));
        }

        views.sort_by_key(|v| std::cmp::Reverse(numeric_id(&v.application.id)));
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::providers::realm::RealmQuery;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const ALICE: &str = "g1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const BOB: &str = "g1r20afxaccdszhknt8t88skmjjngg3ck8kpycs0";

    /// Canned replies keyed by expression; anything else is a transport error
    #[derive(Default)]
    struct ScriptedRealm {
        replies: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRealm {
        fn reply(mut self, expression: &str, text: impl Into<String>) -> Self {
            self.replies.insert(expression.to_string(), text.into());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RealmQuery for ScriptedRealm {
        async fn eval(&self, expression: &str) -> AppResult<String> {
            self.calls.lock().unwrap().push(expression.to_string());
            self.replies
                .get(expression)
                .cloned()
                .ok_or_else(|| AppError::rpc_connection_failed("Connection failed"))
        }
    }

    fn bounty(title: &str, creator: &str) -> String {
        format!(
            "(&(struct{{(0 uint64),(\"{title}\" string),(\"https://x/{title}\" string),\
             (\"d\" string),\
             (500 int64),(\"{creator}\" .uverse.address),(false bool)}} B) *B)"
        )
    }

    fn application(id: u64, applicant: &str, status: u8) -> String {
        format!(
            "(&(struct{{({id} uint64),(1 uint64),(\"{applicant}\" .uverse.address),\
             (\"https://github.com/o/r/pull/{id}\" string),(ref(0a:1) time.Time),\
             ({status} ApplicationStatus)}} A) *A)"
        )
    }

    fn applications(items: &[String]) -> String {
        format!("(slice[{}] []*A)", items.join(","))
    }

    fn service(realm: ScriptedRealm) -> (BountyService, Arc<ScriptedRealm>) {
        let realm = Arc::new(realm);
        (BountyService::new(RealmFacade::new(realm.clone())), realm)
    }

    #[tokio::test]
    async fn test_list_skips_missing_bounty() {
        let (svc, _) = service(
            ScriptedRealm::default()
                .reply("GetBountyCount()", "(3 uint64)")
                .reply("GetBounty(1)", bounty("one", ALICE))
                .reply("GetBounty(2)", "(nil *B)")
                .reply("GetBounty(3)", bounty("three", BOB)),
        );

        let ids: Vec<String> = svc
            .list_bounties()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_list_skips_transport_failure() {
        let (svc, realm) = service(
            ScriptedRealm::default()
                .reply("GetBountyCount()", "(2 uint64)")
                .reply("GetBounty(2)", bounty("two", ALICE)),
        );

        let bounties = svc.list_bounties().await.unwrap();
        assert_eq!(bounties.len(), 1);
        assert_eq!(bounties[0].title, "two");
        assert_eq!(realm.calls(), vec!["GetBountyCount()", "GetBounty(1)", "GetBounty(2)"]);
    }

    #[tokio::test]
    async fn test_zero_count_makes_no_lookups() {
        let (svc, realm) =
            service(ScriptedRealm::default().reply("GetBountyCount()", "(0 uint64)"));
        assert!(svc.list_bounties().await.unwrap().is_empty());
        assert_eq!(realm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_count_failure_propagates() {
        let (svc, _) = service(ScriptedRealm::default());
        let err = svc.list_bounties().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RpcConnectionFailed);
        assert!(err.message.starts_with("failed to get count"));
    }

    #[tokio::test]
    async fn test_get_bounty_not_found() {
        let (svc, _) = service(ScriptedRealm::default().reply("GetBounty(9)", "(nil *B)"));
        let err = svc.get_bounty(9).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RealmNotFound);
    }

    #[tokio::test]
    async fn test_validators_only_for_pending() {
        let (svc, realm) = service(
            ScriptedRealm::default()
                .reply(
                    "GetApplicationsForBounty(1)",
                    applications(&[application(4, ALICE, 0), application(5, BOB, 1)]),
                )
                .reply(
                    "GetValidatorsForApplication(4)",
                    format!("(slice[(\"{BOB}\" .uverse.address)] []address)"),
                ),
        );

        let apps = svc.list_applications(1).await.unwrap();
        assert_eq!(apps[0].validators, vec![BOB.to_string()]);
        assert!(apps[1].validators.is_empty());
        assert!(!realm.calls().contains(&"GetValidatorsForApplication(5)".to_string()));
    }

    #[tokio::test]
    async fn test_validator_failure_is_empty() {
        let (svc, _) = service(
            ScriptedRealm::default()
                .reply("GetApplicationsForBounty(1)", applications(&[application(4, ALICE, 0)])),
        );

        let apps = svc.list_applications(1).await.unwrap();
        assert_eq!(apps.len(), 1);
        assert!(apps[0].validators.is_empty());
    }

    #[tokio::test]
    async fn test_user_bounties_sorted_desc() {
        let (svc, _) = service(
            ScriptedRealm::default()
                .reply("GetBountyCount()", "(3 uint64)")
                .reply("GetBounty(1)", bounty("one", ALICE))
                .reply("GetBounty(2)", bounty("two", BOB))
                .reply("GetBounty(3)", bounty("three", ALICE)),
        );

        let ids: Vec<String> = svc
            .user_bounties(ALICE)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_user_applications_enriched() {
        let (svc, realm) = service(
            ScriptedRealm::default()
                .reply("GetBountyCount()", "(2 uint64)")
                .reply(
                    "GetApplicationsForBounty(1)",
                    applications(&[application(1, ALICE, 0), application(2, BOB, 0)]),
                )
                .reply("GetApplicationsForBounty(2)", applications(&[application(3, ALICE, 1)]))
                .reply("GetBounty(1)", bounty("one", BOB)),
        );

        let views = svc.user_applications(ALICE).await.unwrap();
        let ids: Vec<&str> = views.iter().map(|v| v.application.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);

        assert_eq!(views[0].bounty_title, "Bounty #2");
        assert_eq!(views[0].bounty_amount, "0");
        assert_eq!(views[1].bounty_title, "one");
        assert_eq!(views[1].bounty_amount, "500");
        assert!(views.iter().all(|v| v.application.validators.is_empty()));
        assert!(!realm.calls().iter().any(|c| c.starts_with("GetValidators")));
    }

    #[tokio::test]
    async fn test_leaderboard_failure_propagates() {
        let (svc, _) = service(ScriptedRealm::default());
        let err = svc.leaderboard().await.unwrap_err();
        assert!(err.message.starts_with("failed to get leaderboard"));
    }
}
