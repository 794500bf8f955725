pub mod magic_mime_sniffer;
