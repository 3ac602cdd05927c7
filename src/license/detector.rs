use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::LocalLicenseError;

/// File name stems recognized as license files
const LICENSE_STEMS: &[&str] = &["license", "licence", "copying", "unlicense"];

/// Longest suffix accepted after a stem (`.txt`, `-MIT`, `.markdown`, ...)
const MAX_SUFFIX_LEN: usize = 10;

/// Family titles are only looked for near the top of the text; the earliest
/// one wins since the GPL itself mentions the Affero license.
const HEAD_LEN: usize = 512;

const GPL_TITLES: &[(&str, &str)] = &[
    ("gnu affero general public license", "AGPL"),
    ("gnu lesser general public license", "LGPL"),
    ("gnu library general public license", "LGPL"),
    ("gnu general public license", "GPL"),
];

/// Detect the license of the module unpacked at `dir`.
pub fn detect_license(dir: &Path) -> Result<String, LocalLicenseError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LocalLicenseError::MissingDirectory(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(LocalLicenseError::Io { path: dir.to_path_buf(), source });
        }
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LocalLicenseError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_license_file(&name) && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }

    if candidates.is_empty() {
        return Err(LocalLicenseError::NoLicenseFile);
    }
    candidates.sort();

    let mut types: Vec<String> = Vec::new();
    for path in &candidates {
        let bytes = fs::read(path).map_err(|source| LocalLicenseError::Io {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        match classify_license_text(&text) {
            Some(kind) if !types.iter().any(|t| t == kind) => types.push(kind.to_string()),
            Some(_) => {}
            None => tracing::debug!(file = %path.display(), "license text not recognized"),
        }
    }

    match types.len() {
        0 => Err(LocalLicenseError::Unrecognized),
        1 => Ok(types.remove(0)),
        _ => Err(LocalLicenseError::Ambiguous(types)),
    }
}

fn is_license_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    LICENSE_STEMS.iter().any(|stem| {
        lower
            .strip_prefix(stem)
            .map(|rest| {
                rest.is_empty()
                    || (rest.len() <= MAX_SUFFIX_LEN
                        && rest.starts_with(['.', '-'])
                        && !rest.ends_with(".go"))
            })
            .unwrap_or(false)
    })
}

/// Guess an SPDX identifier from the text of a license file
pub fn classify_license_text(text: &str) -> Option<&'static str> {
    let normalized = normalize(text);
    let head: String = normalized.chars().take(HEAD_LEN).collect();

    let family = GPL_TITLES
        .iter()
        .filter_map(|(title, family)| head.find(title).map(|pos| (pos, *family)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, family)| family);
    match family {
        Some("AGPL") => return Some("AGPL-3.0"),
        Some("LGPL") if head.contains("version 3") => return Some("LGPL-3.0"),
        Some("LGPL") if head.contains("version 2") => return Some("LGPL-2.1"),
        Some("GPL") if head.contains("version 3") => return Some("GPL-3.0"),
        Some("GPL") if head.contains("version 2") => return Some("GPL-2.0"),
        _ => {}
    }
    if normalized.contains("mozilla public license") && normalized.contains("2.0") {
        return Some("MPL-2.0");
    }
    if normalized.contains("apache license") && normalized.contains("version 2.0") {
        return Some("Apache-2.0");
    }
    if normalized.contains("eclipse public license") {
        if normalized.contains("v 2.0") || normalized.contains("version 2.0") {
            return Some("EPL-2.0");
        }
        if normalized.contains("v 1.0") || normalized.contains("v1.0") || normalized.contains("version 1.0") {
            return Some("EPL-1.0");
        }
    }
    if normalized.contains("common development and distribution license") {
        return Some("CDDL-1.0");
    }
    if normalized.contains("cc0 1.0 universal") {
        return Some("CC0-1.0");
    }
    if normalized.contains("this is free and unencumbered software released into the public domain") {
        return Some("Unlicense");
    }
    if normalized.contains("permission is hereby granted, free of charge, to any person obtaining a copy") {
        return Some("MIT");
    }
    if normalized.contains("permission to use, copy, modify, and")
        && normalized.contains("distribute this software for any purpose with or without fee is hereby granted")
    {
        return Some("ISC");
    }
    if normalized.contains("redistribution and use in source and binary forms") {
        if normalized.contains("neither the name") || normalized.contains("may be used to endorse or promote") {
            return Some("BSD-3-Clause");
        }
        return Some("BSD-2-Clause");
    }

    None
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
