pub mod stage1_load;
pub mod stage2_classify;
pub mod stage3_indices;
pub mod stage4_scan;
pub mod stage5_report;
