mod job_test;
mod upload_name_test;
