use std::path::PathBuf;

use eidos::domain::{Job, JobId, JobStatus, progress_percent};

fn new_job() -> Job {
    Job::new(JobId::new(), PathBuf::from("uploads/temp_clip.mp4"), "car".to_string())
}

#[test]
fn given_new_job_when_created_then_processing_at_zero_without_result() {
    let job = new_job();

    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, 0);
    assert!(job.result_path.is_none());
    assert!(job.error_message.is_none());
    assert_eq!(job.created_at, job.updated_at);
}

#[test]
fn given_processing_job_when_progress_recorded_then_value_rises() {
    let mut job = new_job();

    assert!(job.record_progress(42));
    assert_eq!(job.progress, 42);
}

#[test]
fn given_progress_when_lower_value_recorded_then_update_is_ignored() {
    let mut job = new_job();
    job.record_progress(60);

    assert!(!job.record_progress(30));
    assert_eq!(job.progress, 60);
}

#[test]
fn given_progress_above_hundred_when_recorded_then_clamped() {
    let mut job = new_job();

    job.record_progress(250);

    assert_eq!(job.progress, 100);
}

#[test]
fn given_processing_job_when_completed_then_result_set_and_progress_full() {
    let mut job = new_job();
    job.record_progress(99);

    assert!(job.complete(PathBuf::from("outputs/processed_clip.mp4")));

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(
        job.result_path.as_deref(),
        Some(std::path::Path::new("outputs/processed_clip.mp4"))
    );
    assert!(job.is_terminal());
}

#[test]
fn given_processing_job_when_failed_then_error_kept_and_no_result() {
    let mut job = new_job();
    job.record_progress(12);

    assert!(job.fail("Could not open video"));

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_message.as_deref(), Some("Could not open video"));
    assert!(job.result_path.is_none());
    assert_eq!(job.progress, 12);
}

#[test]
fn given_completed_job_when_failed_or_progressed_then_nothing_changes() {
    let mut job = new_job();
    job.complete(PathBuf::from("out.mp4"));

    assert!(!job.fail("late failure"));
    assert!(!job.record_progress(5));
    assert!(!job.complete(PathBuf::from("other.mp4")));

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result_path.as_deref(), Some(std::path::Path::new("out.mp4")));
    assert!(job.error_message.is_none());
}

#[test]
fn given_failed_job_when_completed_then_stays_failed() {
    let mut job = new_job();
    job.fail("boom");

    assert!(!job.complete(PathBuf::from("out.mp4")));
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.result_path.is_none());
}

#[test]
fn given_fractions_when_converted_to_percent_then_floored_and_clamped() {
    assert_eq!(progress_percent(0.0), 0);
    assert_eq!(progress_percent(0.5), 50);
    assert_eq!(progress_percent(0.999), 99);
    assert_eq!(progress_percent(1.0), 100);
    assert_eq!(progress_percent(3.0), 100);
    assert_eq!(progress_percent(-0.2), 0);
    assert_eq!(progress_percent(f32::NAN), 0);
}

#[test]
fn given_status_strings_when_parsed_then_round_trip_through_display() {
    for status in [JobStatus::Processing, JobStatus::Completed, JobStatus::Failed] {
        let parsed: JobStatus = status.to_string().parse().unwrap();
        assert_eq!(parsed, status);
    }
    assert!("queued".parse::<JobStatus>().is_err());
}

#[test]
fn given_only_completed_and_failed_when_checking_terminal_then_true() {
    assert!(!JobStatus::Processing.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
}

#[test]
fn given_non_uuid_when_parsing_job_id_then_none() {
    assert!(JobId::parse("not-a-uuid").is_none());
    assert!(JobId::parse("").is_none());

    let id = JobId::new();
    assert_eq!(JobId::parse(&id.to_string()), Some(id));
}
