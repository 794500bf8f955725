/// Determines a MIME type from byte content alone.
///
/// Implementations must never consult a filename or a client-declared
/// content type.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, content: &[u8]) -> String;
}
