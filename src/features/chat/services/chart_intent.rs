/// Phrases that suggest the user wants a chart or a visual comparison
const CHART_KEYWORDS: &[&str] = &[
    "chart",
    "grafik",
    "graph",
    "visualisasi",
    "visualkan",
    "visualisasikan",
    "diagram",
    "plot",
    "perbandingan",
    "bandingkan",
    "tren",
    "trend",
    "tampilkan data",
    "tampilkan angka",
    "buatkan chart",
    "buatkan grafik",
    "lihat chart",
    "lihat grafik",
    "perkembangan",
    "vs",
    "versus",
    "bar chart",
    "line chart",
    "pie chart",
];

/// Whether the message asks for a visualization
///
/// Plain case-insensitive substring matching, so short keywords also hit
/// inside longer words. The result only steers the prompt header; the model
/// still decides whether a chart is possible.
pub fn detect_chart_needed(message: &str) -> bool {
    let message = message.to_lowercase();
    CHART_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
