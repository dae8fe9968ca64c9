use eidos::domain::{JobId, UploadName, sanitize_filename};

#[test]
fn given_job_id_and_filename_when_naming_video_upload_then_prefixed_with_job_id() {
    let job_id = JobId::new();
    let name = UploadName::for_video(&job_id, "clip.mp4");

    assert_eq!(name.as_str(), format!("temp_{}_clip.mp4", job_id.as_uuid()));
}

#[test]
fn given_same_filename_when_naming_two_image_uploads_then_names_differ() {
    let a = UploadName::for_image("photo.jpg");
    let b = UploadName::for_image("photo.jpg");

    assert_ne!(a, b);
    assert!(a.as_str().starts_with("temp_"));
    assert!(a.as_str().ends_with("_photo.jpg"));
}

#[test]
fn given_upload_name_when_displayed_then_matches_as_str() {
    let name = UploadName::from_raw("temp_x_y.png");

    assert_eq!(format!("{}", name), name.as_str());
}

#[test]
fn given_path_traversal_when_sanitized_then_only_last_component_kept() {
    assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_filename("C:\\videos\\clip.mp4"), "clip.mp4");
}

#[test]
fn given_special_characters_when_sanitized_then_replaced_with_underscore() {
    assert_eq!(sanitize_filename("my clip (1).mp4"), "my_clip__1_.mp4");
    assert_eq!(sanitize_filename("kamera-ø.mov"), "kamera-_.mov");
}

#[test]
fn given_empty_or_dot_names_when_sanitized_then_fallback_used() {
    assert_eq!(sanitize_filename(""), "upload");
    assert_eq!(sanitize_filename(".."), "upload");
    assert_eq!(sanitize_filename("dir/"), "upload");
}
