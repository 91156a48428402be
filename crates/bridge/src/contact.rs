//! Contact manifold views.

use abi::ContactInfo;

use crate::body::Body;

/// A manifold snapshot read out after a step. Plain data: the native side
/// owns the contact's lifecycle and this view does not outlive the bodies it
/// names.
#[derive(Copy, Clone, Debug)]
pub struct Contact {
    info: ContactInfo,
}

impl Contact {
    #[must_use]
    pub fn new(info: ContactInfo) -> Self {
        Self { info }
    }

    #[must_use]
    pub fn info(&self) -> &ContactInfo {
        &self.info
    }

    /// Whether `body` is one of the pair.
    #[must_use]
    pub fn involves(&self, body: &Body) -> bool {
        let addr = body.handle().addr();
        self.info.body_a == addr || self.info.body_b == addr
    }

    #[must_use]
    pub fn penetration(&self) -> f32 {
        self.info.penetration
    }
}
