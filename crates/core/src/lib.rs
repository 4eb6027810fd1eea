pub mod annotation {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_candidate;
        pub mod face_detector;
        pub mod face_rules;
        pub mod verdict;
    }
    pub mod infrastructure;
}

pub mod imaging {
    pub mod clahe;
    pub mod grayscale;
}

pub mod pipeline {
    pub mod analyze_frame_use_case;
    pub mod capture_loop;
    pub mod capture_session;
    pub mod clock;
    pub mod frame_slot;
    pub mod pipeline_logger;
}

pub mod shared {
    pub mod constants;
    pub mod detection_box;
    pub mod display_image;
    pub mod frame;
}

pub mod video {
    pub mod domain {
        pub mod frame_sink;
        pub mod frame_source;
        pub mod image_writer;
    }
    pub mod infrastructure;
}
