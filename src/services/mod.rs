//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod backup;
pub mod clock;
pub mod export;
pub mod sms;
pub mod storage;

// Re-export commonly used services
pub use auth::{AuthService, StaffClaims, StaffContext};
pub use backup::{BackupEntry, BackupService};
pub use clock::ClockService;
pub use export::ExportService;
pub use sms::{MessageContext, SmsService};
pub use storage::{StorageService, UploadKind};

use crate::config::settings::Settings;
use crate::database::repositories::{SmsRepository, StaffRepository};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub clock_service: ClockService,
    pub sms_service: SmsService,
    pub export_service: ExportService,
    pub backup_service: BackupService,
    pub storage_service: StorageService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: Settings,
        staff_repository: StaffRepository,
        sms_repository: SmsRepository,
    ) -> Self {
        let auth_service = AuthService::new(staff_repository, settings.clone());
        let clock_service = ClockService::new(settings.clone());
        let sms_service = SmsService::new(sms_repository);
        let export_service = ExportService::new();
        let backup_service = BackupService::new(settings.clone());
        let storage_service = StorageService::new(settings);

        Self {
            auth_service,
            clock_service,
            sms_service,
            export_service,
            backup_service,
            storage_service,
        }
    }
}
