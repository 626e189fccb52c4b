//! Platform capability ports
//!
//! The registrar and radio coordinator never look platform services up
//! themselves. Each component is handed the ports it needs at construction:
//!
//! - [`Telephony`]: device, SIM and line-1 identifiers
//! - [`Connectivity`]: whether an active network exists right now
//! - [`Broadcaster`]: fire-and-forget delivery of an [`Intent`]
//!
//! Host adapters live in the submodules and in [`crate::broadcast`].

pub mod connectivity;
pub mod telephony;

use crate::broadcast::intent::Intent;

pub use connectivity::SysfsConnectivity;
pub use telephony::StaticTelephony;

/// Read-only telephony identifiers. Any of them may be unavailable
/// (no SIM inserted, carrier does not expose the line number).
pub trait Telephony {
    fn device_id(&self) -> Option<String>;
    fn sim_id(&self) -> Option<String>;
    fn phone_number(&self) -> Option<String>;
}

/// Live connectivity query. Implementations must not cache.
pub trait Connectivity {
    fn has_active_network(&self) -> bool;
}

/// Fire-and-forget message delivery to platform listeners.
///
/// An `Ok` only means the message left this process; nothing confirms that
/// a listener received or acted on it.
#[allow(async_fn_in_trait)]
pub trait Broadcaster {
    async fn send_broadcast(&self, intent: &Intent) -> anyhow::Result<()>;
}

impl<T: Telephony + ?Sized> Telephony for &T {
    fn device_id(&self) -> Option<String> {
        (**self).device_id()
    }

    fn sim_id(&self) -> Option<String> {
        (**self).sim_id()
    }

    fn phone_number(&self) -> Option<String> {
        (**self).phone_number()
    }
}

impl<C: Connectivity + ?Sized> Connectivity for &C {
    fn has_active_network(&self) -> bool {
        (**self).has_active_network()
    }
}

impl<B: Broadcaster> Broadcaster for &B {
    async fn send_broadcast(&self, intent: &Intent) -> anyhow::Result<()> {
        (**self).send_broadcast(intent).await
    }
}
