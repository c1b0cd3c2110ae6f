//! RFCOMM transport for Bluetooth clients

use crate::config::{ServiceIdentity, TransportKind};
use crate::transport::traits::TransportListener;
use async_trait::async_trait;
use bluer::rfcomm::{Profile, ProfileHandle, Role, Stream as RfcommStream};
use bluer::{Adapter, Session, Uuid};
use futures::StreamExt;
use std::io;
use tracing::info;

/// Bluetooth listener that registers an RFCOMM server profile
pub struct RfcommListener {
    session: Session,
    adapter: Adapter,
    channel: u8,
    /// Set once the profile is registered
    profile: Option<ProfileHandle>,
}

impl RfcommListener {
    /// Power up the default adapter and make it discoverable
    pub async fn bind(channel: u8) -> io::Result<Self> {
        let session = Session::new().await.map_err(io::Error::other)?;
        let adapter = session.default_adapter().await.map_err(io::Error::other)?;
        adapter.set_powered(true).await.map_err(io::Error::other)?;
        adapter.set_discoverable(true).await.map_err(io::Error::other)?;

        info!(
            "[BT] Adapter {} ready on channel {}",
            adapter.name(),
            channel
        );
        Ok(Self {
            session,
            adapter,
            channel,
            profile: None,
        })
    }
}

#[async_trait]
impl TransportListener for RfcommListener {
    type Stream = RfcommStream;

    async fn advertise(&mut self, identity: &ServiceIdentity) -> io::Result<()> {
        let uuid = Uuid::from_u128(identity.uuid);
        let profile = Profile {
            uuid,
            name: Some(identity.name.clone()),
            channel: Some(self.channel.into()),
            role: Some(Role::Server),
            require_authentication: Some(false),
            require_authorization: Some(false),
            ..Default::default()
        };

        let handle = self
            .session
            .register_profile(profile)
            .await
            .map_err(io::Error::other)?;
        self.profile = Some(handle);

        info!("[BT] Advertising '{}' ({})", identity.name, uuid);
        Ok(())
    }

    async fn accept(&mut self) -> io::Result<(Self::Stream, String)> {
        let profile = self.profile.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "RFCOMM profile not registered")
        })?;

        let request = profile.next().await.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "RFCOMM profile closed")
        })?;
        let peer = request.device();
        let stream = request
            .accept()
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionAborted, e))?;

        Ok((stream, peer.to_string()))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Rfcomm
    }

    fn local_endpoint(&self) -> String {
        format!("{} channel {}", self.adapter.name(), self.channel)
    }
}
