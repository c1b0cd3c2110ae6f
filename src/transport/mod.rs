pub mod tcp;
pub mod traits;
#[cfg(target_os = "linux")]
pub mod rfcomm;

#[cfg(target_os = "linux")]
pub use rfcomm::RfcommListener;
pub use tcp::TcpTransportListener;
pub use traits::{is_transient, TransportListener, TransportStream};
