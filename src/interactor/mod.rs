pub mod auth_interactor;
pub mod demo_interactor;
pub mod price_interactor;
pub mod send_interactor;
pub mod swap_interactor;
pub mod wallet_interactor;

pub use auth_interactor::{AuthInteractor, AuthInteractorImpl, Registration};
pub use demo_interactor::{DemoInteractor, DemoInteractorImpl};
pub use price_interactor::{PriceInteractor, PriceInteractorImpl};
pub use send_interactor::{SendInteractor, SendInteractorImpl};
pub use swap_interactor::{SwapInteractor, SwapInteractorImpl};
pub use wallet_interactor::{WalletInteractor, WalletInteractorImpl};
