//! Profile settings: uploaded avatars and progress reset.

use crate::catalog::triggers;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::rewards::process_action;

/// Image extensions accepted for avatar uploads.
pub const ALLOWED_AVATAR_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Whether `file_name` keeps an allowed avatar extension (case-insensitive)
/// once sanitized, so the stored name still carries it.
#[must_use]
pub fn is_allowed_avatar(file_name: &str) -> bool {
    sanitize_file_name(file_name)
        .rsplit_once('.')
        .is_some_and(|(_, ext)| {
            ALLOWED_AVATAR_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Reduce an uploaded file name to a safe single path component.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`, turns whitespace into `_`,
/// drops everything else and strips leading dots and underscores.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Stored file name for a student's uploaded avatar.
#[must_use]
pub fn avatar_file_name(student_id: &crate::ids::StudentId, original: &str) -> String {
    sanitize_file_name(&format!("user_{student_id}_{}", sanitize_file_name(original)))
}

/// Point the avatar slot at an uploaded file and fire `cambiar_avatar`.
///
/// # Errors
///
/// Returns an error if mission processing fails.
pub fn set_uploaded_avatar<L: Ledger + ?Sized>(ledger: &mut L, file_name: String) -> Result<()> {
    let student = ledger.student_mut();
    student.cosmetics.avatar = Some(file_name);
    student.updated_at = chrono::Utc::now();
    tracing::info!(student_id = %student.id, "Avatar uploaded");

    process_action(ledger, triggers::CHANGE_AVATAR, 1)
}

/// Reset the student to a fresh start.
///
/// Points, experience and level return to their initial values, cosmetics to
/// the defaults, and inventory, mission progress, achievements and activity
/// history are cleared. Achievements are not re-evaluated here; level-1
/// achievements come back on the next evaluation.
pub fn reset_progress<L: Ledger + ?Sized>(ledger: &mut L) {
    ledger.student_mut().reset_progress();
    ledger.clear_student_records();
    tracing::info!(student_id = %ledger.student().id, "Progress reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ItemId, MissionId, StudentId};
    use crate::student::Cosmetics;
    use crate::testing::MemoryLedger;

    #[test]
    fn avatar_extension_allow_list() {
        assert!(is_allowed_avatar("me.png"));
        assert!(is_allowed_avatar("ME.JPEG"));
        assert!(is_allowed_avatar("a.b.webp"));
        assert!(!is_allowed_avatar("script.svg"));
        assert!(!is_allowed_avatar("noextension"));
    }

    #[test]
    fn extension_lost_to_sanitizing_is_rejected() {
        assert!(!is_allowed_avatar("..png"));
        assert!(!is_allowed_avatar(".png"));
        assert!(!is_allowed_avatar("fotos/..gif"));
        assert!(is_allowed_avatar("..cara.png"));
    }

    #[test]
    fn allowed_avatars_keep_their_extension_when_stored() {
        let id = StudentId::generate();
        for original in ["me.png", "..cara.png", "mi foto.JPG", "dir/x.webp"] {
            assert!(is_allowed_avatar(original));
            let stored = avatar_file_name(&id, original);
            let (_, ext) = stored.rsplit_once('.').unwrap();
            assert!(ALLOWED_AVATAR_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)));
        }
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my photo!.png"), "my_photo.png");
        assert_eq!(sanitize_file_name("..hidden.png"), "hidden.png");
        assert_eq!(sanitize_file_name("C:\\pics\\cara.jpg"), "cara.jpg");
    }

    #[test]
    fn avatar_file_name_is_user_scoped() {
        let id = StudentId::generate();
        let name = avatar_file_name(&id, "../Mi Foto.png");
        assert_eq!(name, format!("user_{id}_Mi_Foto.png"));
    }

    #[test]
    fn uploaded_avatar_fires_change_avatar() {
        let mut ledger = MemoryLedger::seeded();

        set_uploaded_avatar(&mut ledger, "user_x_me.png".into()).unwrap();

        assert_eq!(ledger.student.cosmetics.avatar.as_deref(), Some("user_x_me.png"));
        assert!(ledger.progress_of(MissionId::new(9)).unwrap().completed);
    }

    #[test]
    fn reset_clears_everything() {
        let mut ledger = MemoryLedger::seeded();
        ledger.student.points = 300;
        ledger.student.xp = 250;
        ledger.student.level = 3;
        ledger.student.cosmetics.frame = Some("marco-2.png".into());
        ledger.inventory.insert(ItemId::new(3));
        ledger.save_completed(MissionId::new(1));
        crate::rewards::evaluate_achievements(&mut ledger).unwrap();
        assert!(!ledger.achievements.is_empty());

        reset_progress(&mut ledger);

        assert_eq!(ledger.student.points, 0);
        assert_eq!(ledger.student.xp, 0);
        assert_eq!(ledger.student.level, 1);
        assert_eq!(ledger.student.cosmetics, Cosmetics::default());
        assert!(ledger.inventory.is_empty());
        assert!(ledger.progress.is_empty());
        assert!(ledger.achievements.is_empty());
        assert!(ledger.completions.is_empty());
    }
}
