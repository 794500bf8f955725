//! Upload → detect → annotate → broadcast pipeline for face detection.
//!
//! Each bounded context splits into `domain` (traits, value types, errors)
//! and `infrastructure` (concrete adapters). Everything here is synchronous.

pub mod shared {
    pub mod bounding_box;
    pub mod constants;
    pub mod frame;
}

pub mod upload {
    pub mod domain {
        pub mod mime_sniffer;
        pub mod upload_request;
        pub mod validation_error;
    }
    pub mod infrastructure;
    pub mod upload_validator;
}

pub mod imaging {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod annotation {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detection_params;
        pub mod face_classifier;
    }
    pub mod image_detector;
    pub mod infrastructure;
}

pub mod storage {
    pub mod domain {
        pub mod blob_store;
    }
    pub mod infrastructure;
}

pub mod broadcast {
    pub mod domain {
        pub mod server_event;
        pub mod subscriber_handle;
    }
    pub mod group_registry;
}

pub mod pipeline {
    pub mod media_url;
    pub mod upload_pipeline;
    pub mod upload_response;
}
