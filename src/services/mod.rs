pub mod tutor;

pub use tutor::TutorService;
