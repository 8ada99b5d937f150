/// Environment variable containing the DynamoDB table name
pub const FEEDBACK_TABLE_NAME: &'static str = "FEEDBACK_TABLE_NAME";
/// Environment variable toggling strongly consistent reads
pub const FEEDBACK_CONSISTENT_READ: &'static str = "FEEDBACK_CONSISTENT_READ";
/// Environment variable capping the number of items in each scan page
pub const FEEDBACK_SCAN_PAGE_SIZE: &'static str = "FEEDBACK_SCAN_PAGE_SIZE";

/// Table used when `FEEDBACK_TABLE_NAME` is unset
pub const DEFAULT_TABLE_NAME: &'static str = "TB_FEEDBACKS";
/// Region used when none is found in the AWS provider chain
pub const DEFAULT_REGION: &'static str = "ap-southeast-1";
