//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. The table covers the
//! asset types a browser game ships: page code, textures, audio, fonts,
//! model files, and raw data packs.

/// Get MIME Content-Type based on file extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Page and script assets
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Textures and images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",

        // Audio (music and effects)
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "oga") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Model files
        Some("gltf") => "model/gltf+json",
        Some("glb") => "model/gltf-binary",

        // Video (cutscenes)
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        // Data packs and everything else
        _ => "application/octet-stream",
    }
}
