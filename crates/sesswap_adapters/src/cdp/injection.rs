//! Builder for the page-side executor script
//!
//! The executor is a self-contained script evaluated inside the target page.
//! It writes the credential under the session storage key, renders a
//! dismissible reload notification, and returns a stringified switch
//! response. The request is embedded as a JSON literal so arbitrary names
//! and tokens cannot break out of the script.

use sesswap_core::protocol::{SwitchRequest, SESSION_STORAGE_KEY};
use sesswap_core::Error;

/// DOM id of the notification; re-running the switch replaces it
const BANNER_ID: &str = "sesswap-session-banner";

/// Fade-out duration for dismissing the notification, in milliseconds
const BANNER_FADE_MS: u32 = 200;

pub fn build_switch_script(request: &SwitchRequest) -> Result<String, Error> {
    let request_literal = serde_json::to_string(request)
        .map_err(|e| Error::Other(format!("failed to encode switch request: {}", e)))?;
    let key_literal = serde_json::to_string(SESSION_STORAGE_KEY)
        .map_err(|e| Error::Other(format!("failed to encode storage key: {}", e)))?;
    let banner_id_literal = serde_json::to_string(BANNER_ID)
        .map_err(|e| Error::Other(format!("failed to encode banner id: {}", e)))?;

    let mut script = String::new();
    script.push_str("(() => {\n");
    script.push_str(&format!("  const request = {};\n", request_literal));
    script.push_str(&format!("  const key = {};\n", key_literal));

    // The storage write decides the outcome; everything after it is UI.
    script.push_str("  try {\n");
    script.push_str("    window.localStorage.setItem(key, request.payload.authId);\n");
    script.push_str("  } catch (err) {\n");
    script.push_str("    const message = err && err.message ? err.message : String(err);\n");
    script.push_str("    return JSON.stringify({ success: false, message: message });\n");
    script.push_str("  }\n");

    script.push_str("  try {\n");
    script.push_str(&format!("    const bannerId = {};\n", banner_id_literal));
    script.push_str("    const previous = document.getElementById(bannerId);\n");
    script.push_str("    if (previous) previous.remove();\n");
    script.push_str("    const banner = document.createElement(\"div\");\n");
    script.push_str("    banner.id = bannerId;\n");
    script.push_str(
        "    banner.style.cssText = \"position:fixed;top:16px;right:16px;z-index:2147483647;\" +\n",
    );
    script.push_str(
        "      \"display:flex;align-items:center;gap:12px;padding:12px 16px;border-radius:8px;\" +\n",
    );
    script.push_str(
        "      \"background:#1f2933;color:#f5f7fa;font:14px/1.4 system-ui,sans-serif;\" +\n",
    );
    script.push_str(&format!(
        "      \"box-shadow:0 4px 12px rgba(0,0,0,0.35);opacity:1;transition:opacity {}ms ease\";\n",
        BANNER_FADE_MS
    ));
    script.push_str("    const label = document.createElement(\"span\");\n");
    script.push_str(
        "    label.textContent = \"Switched to \" + request.payload.name + \". Reload to apply.\";\n",
    );
    script.push_str("    const reload = document.createElement(\"button\");\n");
    script.push_str("    reload.textContent = \"Reload now\";\n");
    script.push_str(
        "    reload.style.cssText = \"cursor:pointer;border:0;border-radius:4px;padding:6px 10px;background:#4c9aff;color:#06101f;font:inherit\";\n",
    );
    script.push_str("    reload.addEventListener(\"click\", () => window.location.reload());\n");
    script.push_str("    const dismiss = document.createElement(\"button\");\n");
    script.push_str("    dismiss.textContent = \"Dismiss\";\n");
    script.push_str(
        "    dismiss.style.cssText = \"cursor:pointer;border:0;border-radius:4px;padding:6px 10px;background:transparent;color:#9aa5b1;font:inherit\";\n",
    );
    script.push_str("    dismiss.addEventListener(\"click\", () => {\n");
    script.push_str("      banner.style.opacity = \"0\";\n");
    script.push_str(&format!(
        "      setTimeout(() => banner.remove(), {});\n",
        BANNER_FADE_MS
    ));
    script.push_str("    });\n");
    script.push_str("    banner.appendChild(label);\n");
    script.push_str("    banner.appendChild(reload);\n");
    script.push_str("    banner.appendChild(dismiss);\n");
    script.push_str("    (document.body || document.documentElement).appendChild(banner);\n");
    script.push_str("  } catch (uiErr) {\n");
    script.push_str("    // The write already happened; the notification is best-effort.\n");
    script.push_str("  }\n");

    script.push_str("  return JSON.stringify({ success: true });\n");
    script.push_str("})()\n");

    Ok(script)
}
