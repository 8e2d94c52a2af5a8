//! `sb inspect`: summarize a bundle without touching any store.

use sb::{CookieRecord, normalize_str};
use tracing::info;

use super::read_bundle;
use crate::cli::InspectArgs;
use crate::error::Result;
use crate::output::{self, CommandInputs, CookieSummary, DiagnosticLevel, InspectData, OutputFormat, ResultBuilder};

pub fn execute(args: &InspectArgs, format: OutputFormat) -> Result<()> {
	info!(target = "sb", file = %args.file.display(), "inspecting bundle");

	let text = read_bundle(&args.file)?;
	let normalized = normalize_str(&text)?;
	let bundle = &normalized.bundle;

	let data = InspectData {
		shape: normalized.shape.to_string(),
		source_url: bundle.source_url.clone(),
		source_origin: bundle.source_origin(),
		cookie_count: bundle.cookies.len(),
		cookies: bundle.cookies.iter().map(summarize).collect(),
		cookies_dropped: normalized.cookies_dropped,
		storage_key_count: bundle.local_storage.len(),
		storage_keys: bundle.local_storage.keys().cloned().collect(),
	};

	let mut builder = ResultBuilder::new("inspect")
		.inputs(CommandInputs {
			file: Some(args.file.clone()),
			..Default::default()
		})
		.data(data);
	if bundle.is_empty() {
		builder = builder.diagnostic(DiagnosticLevel::Info, "bundle is empty");
	}

	output::print_result(&builder.build(), format);
	Ok(())
}

fn summarize(cookie: &CookieRecord) -> CookieSummary {
	CookieSummary {
		name: cookie.name.clone(),
		domain: cookie.domain.clone(),
		path: cookie.path.clone(),
		expires: format_expiry(cookie),
		same_site: cookie.same_site.clone(),
		secure: cookie.secure.unwrap_or(false),
		http_only: cookie.http_only.unwrap_or(false),
	}
}

fn format_expiry(cookie: &CookieRecord) -> String {
	let now = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0);
	format_expiry_at(cookie, now)
}

fn format_expiry_at(cookie: &CookieRecord, now: i64) -> String {
	if cookie.is_session() {
		// Unparsable `expires` text is still a persistent cookie; show it as captured.
		return match cookie.expires.as_deref() {
			Some(raw) if cookie.expiry_epoch().is_none() => raw.to_string(),
			_ => "session".into(),
		};
	}

	let ts = cookie.expiry_epoch().unwrap_or_default() as i64;
	if ts < now {
		return "expired".into();
	}

	match ts - now {
		d if d < 3600 => format!("{}m", d / 60),
		d if d < 86400 => format!("{}h", d / 3600),
		d => format!("{}d", d / 86400),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const NOW: i64 = 1_700_000_000;

	#[test]
	fn expiry_buckets() {
		let at = |epoch: f64| format_expiry_at(&CookieRecord::new("a", "b").expiration_date(epoch), NOW);

		assert_eq!(at(-1.0), "session");
		assert_eq!(at((NOW - 10) as f64), "expired");
		assert_eq!(at((NOW + 600) as f64), "10m");
		assert_eq!(at((NOW + 7200) as f64), "2h");
		assert_eq!(at((NOW + 3 * 86400) as f64), "3d");
	}

	#[test]
	fn http_date_expiry_is_shown_verbatim() {
		let mut cookie = CookieRecord::new("a", "b");
		cookie.expires = Some("Wed, 21 Oct 2015 07:28:00 GMT".into());
		assert_eq!(format_expiry_at(&cookie, NOW), "Wed, 21 Oct 2015 07:28:00 GMT");
	}

	#[test]
	fn summary_defaults_flags_to_false() {
		let summary = summarize(&CookieRecord::new("sid", "abc").domain(".example.com"));
		assert_eq!(summary.domain.as_deref(), Some(".example.com"));
		assert!(!summary.secure);
		assert!(!summary.http_only);
		assert_eq!(summary.expires, "session");
	}
}
