//! 评分指纹
//!
//! 指纹是 (用户, 课程, 教师) 的 64 位 FNV-1a 摘要。评分表只保存指纹，
//! 不保存用户名，因此评分记录无法反查到评分人，同时仍可按指纹做点查询。

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 字段分隔符，避免 ("ab", "c") 与 ("a", "bc") 拼接后相同
const FIELD_SEPARATOR: u8 = 0x1f;

fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(hash, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// 计算评分指纹（16 位小写十六进制）
pub fn fingerprint(username: &str, course_code: &str, professor_id: &str) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for (i, field) in [username, course_code, professor_id].iter().enumerate() {
        if i > 0 {
            hash = fnv1a(hash, &[FIELD_SEPARATOR]);
        }
        hash = fnv1a(hash, field.as_bytes());
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFESSOR: &str = "4f0c2a9e-3c1b-4d8e-9a57-0b6f1e2d3c4b";

    #[test]
    fn test_fnv1a_reference_vectors() {
        assert_eq!(fnv1a(FNV_OFFSET_BASIS, b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(FNV_OFFSET_BASIS, b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_deterministic() {
        let first = fingerprint("jim", "S209", PROFESSOR);
        let second = fingerprint("jim", "S209", PROFESSOR);
        assert_eq!(first, second);
        assert_eq!(first.len(), 16);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_every_field_matters() {
        let base = fingerprint("jim", "S209", PROFESSOR);
        assert_ne!(base, fingerprint("tim", "S209", PROFESSOR));
        assert_ne!(base, fingerprint("jim", "CN9A", PROFESSOR));
        assert_ne!(
            base,
            fingerprint("jim", "S209", "00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn test_field_boundaries() {
        assert_ne!(
            fingerprint("jimS", "209", PROFESSOR),
            fingerprint("jim", "S209", PROFESSOR)
        );
        assert_ne!(fingerprint("a", "b", "c"), fingerprint("c", "b", "a"));
    }
}
