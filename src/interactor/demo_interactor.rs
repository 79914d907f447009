use crate::catalog::TokenCatalog;
use crate::demo::{DemoError, DemoSessions, DemoState, DemoStore, DemoWallet};
use crate::entity::Token;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Demo actions scoped to one client session id
#[async_trait]
pub trait DemoInteractor: Send + Sync {
    /// Unknown sessions read as a fresh, inactive state
    async fn state(&self, session: &str) -> DemoState;
    async fn enter(&self, session: &str) -> Result<DemoState>;
    async fn exit(&self, session: &str) -> Result<DemoState>;
    async fn buy(&self, session: &str, token_id: &str, amount: f64) -> Result<DemoState>;
    async fn sell(&self, session: &str, token_id: &str, amount: f64) -> Result<DemoState>;
    /// `token_id = None` sends SOL
    async fn send(
        &self,
        session: &str,
        recipient: &str,
        amount: f64,
        token_id: Option<&str>,
    ) -> Result<DemoState>;
}

/// One demo state per session, all saved together after every change.
pub struct DemoInteractorImpl {
    sessions: Mutex<DemoSessions>,
    store: DemoStore,
    catalog: Arc<TokenCatalog>,
}

impl DemoInteractorImpl {
    /// Restore the last saved sessions from `store`
    pub async fn load(store: DemoStore, catalog: Arc<TokenCatalog>) -> Result<Self> {
        let sessions = store.load().await?;
        info!(
            "Loaded {} demo session(s) from {}",
            sessions.len(),
            store.path().display()
        );

        Ok(Self {
            sessions: Mutex::new(sessions),
            store,
            catalog,
        })
    }

    fn token(&self, token_id: &str) -> Result<&Token, DemoError> {
        self.catalog
            .find(token_id)
            .ok_or_else(|| DemoError::UnknownToken(token_id.to_string()))
    }

    /// Run `action` on a copy of the session's state; the copy replaces the
    /// live state only after it is saved. An inactive result drops the session.
    async fn update<F>(&self, session: &str, action: F) -> Result<DemoState>
    where
        F: FnOnce(&mut DemoState) -> Result<(), DemoError> + Send,
    {
        let mut sessions = self.sessions.lock().await;
        let mut next = sessions.get(session).cloned().unwrap_or_default();
        action(&mut next)?;

        let mut saved = sessions.clone();
        if next.active {
            saved.insert(session.to_string(), next.clone());
        } else {
            saved.remove(session);
        }
        self.store.save(&saved).await?;

        *sessions = saved;
        Ok(next)
    }

    async fn trade<F>(
        &self,
        session: &str,
        token_id: &str,
        amount: f64,
        action: F,
    ) -> Result<DemoState>
    where
        F: FnOnce(&mut DemoWallet, &Token, f64) -> Result<(), DemoError> + Send,
    {
        let token = self.token(token_id)?.clone();
        self.update(session, move |state| action(state.wallet_mut()?, &token, amount))
            .await
    }
}

#[async_trait]
impl DemoInteractor for DemoInteractorImpl {
    async fn state(&self, session: &str) -> DemoState {
        self.sessions
            .lock()
            .await
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    async fn enter(&self, session: &str) -> Result<DemoState> {
        self.update(session, |state| {
            if state.enter() {
                info!("Demo mode entered");
            }
            Ok(())
        })
        .await
    }

    async fn exit(&self, session: &str) -> Result<DemoState> {
        self.update(session, |state| {
            state.exit();
            info!("Demo mode exited");
            Ok(())
        })
        .await
    }

    async fn buy(&self, session: &str, token_id: &str, amount: f64) -> Result<DemoState> {
        self.trade(session, token_id, amount, |wallet, token, amount| {
            wallet.buy(token, amount).map(|_| ())
        })
        .await
    }

    async fn sell(&self, session: &str, token_id: &str, amount: f64) -> Result<DemoState> {
        self.trade(session, token_id, amount, |wallet, token, amount| {
            wallet.sell(token, amount).map(|_| ())
        })
        .await
    }

    async fn send(
        &self,
        session: &str,
        recipient: &str,
        amount: f64,
        token_id: Option<&str>,
    ) -> Result<DemoState> {
        let token = token_id.map(|id| self.token(id).cloned()).transpose()?;
        let recipient = recipient.to_string();

        self.update(session, move |state| {
            state
                .wallet_mut()?
                .send(&recipient, amount, token.as_ref())
                .map(|_| ())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::INITIAL_DEMO_BALANCE;
    use solana_sdk::pubkey::Pubkey;

    const ALICE: &str = "alice";
    const BOB: &str = "bob";

    async fn interactor(dir: &tempfile::TempDir) -> DemoInteractorImpl {
        DemoInteractorImpl::load(
            DemoStore::new(dir.path().join("demo.json")),
            Arc::new(TokenCatalog::builtin().unwrap()),
        )
        .await
        .unwrap()
    }

    fn demo_error(err: &anyhow::Error) -> &DemoError {
        err.downcast_ref::<DemoError>().unwrap()
    }

    #[tokio::test]
    async fn actions_require_demo_mode() {
        let dir = tempfile::tempdir().unwrap();
        let demo = interactor(&dir).await;

        let err = demo.buy(ALICE, "nordic-wind", 1.0).await.unwrap_err();
        assert_eq!(demo_error(&err), &DemoError::Inactive);
        assert_eq!(demo.state(ALICE).await, DemoState::default());
    }

    #[tokio::test]
    async fn buy_is_saved_and_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let demo = interactor(&dir).await;
        let value = TokenCatalog::builtin().unwrap().find("nordic-wind").unwrap().current_value;

        demo.enter(ALICE).await.unwrap();
        let state = demo.buy(ALICE, "nordic-wind", 100.0).await.unwrap();
        assert_eq!(state.wallet.sol_balance, INITIAL_DEMO_BALANCE - 100.0 * value);
        assert_eq!(state.wallet.holding("nordic-wind"), 100.0);

        let reloaded = interactor(&dir).await;
        assert_eq!(reloaded.state(ALICE).await, state);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let demo = interactor(&dir).await;

        demo.enter(ALICE).await.unwrap();
        let alice = demo.buy(ALICE, "nordic-wind", 100.0).await.unwrap();

        assert_eq!(demo.state(BOB).await, DemoState::default());
        let err = demo.sell(BOB, "nordic-wind", 1.0).await.unwrap_err();
        assert_eq!(demo_error(&err), &DemoError::Inactive);

        demo.enter(BOB).await.unwrap();
        let bob = demo.exit(BOB).await.unwrap();
        assert!(!bob.active);

        assert_eq!(demo.state(ALICE).await, alice);
        assert_eq!(interactor(&dir).await.state(ALICE).await, alice);
    }

    #[tokio::test]
    async fn failed_actions_change_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let demo = interactor(&dir).await;
        let before = demo.enter(ALICE).await.unwrap();

        let err = demo.buy(ALICE, "missing", 1.0).await.unwrap_err();
        assert!(matches!(demo_error(&err), DemoError::UnknownToken(_)));
        assert!(demo.sell(ALICE, "nordic-wind", 1.0).await.is_err());
        assert!(demo.buy(ALICE, "nordic-wind", 1e9).await.is_err());
        assert!(demo.send(ALICE, "bad", 1.0, None).await.is_err());

        assert_eq!(demo.state(ALICE).await, before);
    }

    #[tokio::test]
    async fn send_and_exit() {
        let dir = tempfile::tempdir().unwrap();
        let demo = interactor(&dir).await;
        demo.enter(ALICE).await.unwrap();

        let recipient = Pubkey::new_unique().to_string();
        let state = demo.send(ALICE, &recipient, 1.5, None).await.unwrap();
        assert_eq!(state.wallet.sol_balance, INITIAL_DEMO_BALANCE - 1.5);
        assert_eq!(state.wallet.history.len(), 1);

        let state = demo.exit(ALICE).await.unwrap();
        assert!(!state.active);
        assert!(state.wallet.history.is_empty());
        assert!(DemoStore::new(dir.path().join("demo.json"))
            .load()
            .await
            .unwrap()
            .is_empty());
    }
}
