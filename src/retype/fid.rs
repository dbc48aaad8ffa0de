use crate::errors::{RetypeError, Result};
use crate::feature::FeatureId;

/// Re-tags a feature id with a different feature type name, preserving the
/// backend-assigned local id untouched.
///
/// The id must actually belong to `from`: an id from some other feature type
/// is never silently re-tagged.
pub fn retype_fid(fid: &FeatureId, from: &str, to: &str) -> Result<FeatureId> {
    if fid.feature_type() != from {
        return Err(RetypeError::FidTypeMismatch {
            fid: fid.to_string(),
            expected: from.to_string(),
        });
    }
    Ok(FeatureId::new(to, fid.local()))
}
