//! Channel identifiers and descriptors registered with the host transport.

/// One-byte channel identifier multiplexed over a peer connection.
pub type ChannelId = u8;

/// Scheduling parameters the host transport applies to a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub id: ChannelId,
    /// Relative priority; lower values yield to core protocol traffic.
    pub priority: u32,
    pub send_queue_capacity: usize,
    pub recv_buffer_capacity: usize,
    pub recv_message_capacity: usize,
}
