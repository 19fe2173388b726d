pub mod bootstrap;
pub mod codec;
pub mod error;
pub mod params;
pub mod payment;
pub mod rest;
pub mod server;
pub mod session;
pub mod signing;
pub mod widget;

pub use bootstrap::{Bootstrap, InitArgs, Location, OAuthConfig, bootstrap};
pub use error::SdkError;
pub use params::{ParamValue, Params};
pub use payment::{PaymentOptions, Product, payment_link};
pub use rest::{HttpTransport, RestClient, RestOptions, RestRequest, RestTransport};
pub use server::{AppState, router, run};
pub use session::{Credential, Layout, Platform, SessionState};
pub use signing::{SessionSigner, calc_signature};
pub use widget::{Widget, WidgetAction, WidgetBuilder, WidgetContext, dispatch, widget_link};
