//! 기동 시 터미널 배너 출력

use crate::config::AppConfig;

pub fn print_boxed_title(title: &str) {
    // 고정 너비 50칸 사용 (박스 내부 콘텐츠)
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 기동 요약을 출력합니다. 시크릿 값은 출력하지 않습니다.
pub fn print_startup_summary(config: &AppConfig) {
    println!();
    print_boxed_title("💰 BUDGET SESSION GATEWAY");
    print_sub_task("Environment", &format!("{:?}", config.environment));
    print_sub_task("Bind", &config.server.bind_address());
    print_sub_task("Backend", &config.backend.base_url);
    print_sub_task(
        "Backend token",
        &format!("{:?} (retries ≤ {})", config.backend_token.algorithm, config.backend.max_retries),
    );
    print_sub_task("Session max age", &format!("{} days", config.session.max_age_days));
    print_sub_task("Secure cookies", if config.cookies.secure { "on" } else { "off" });

    let providers: Vec<&str> = config
        .oauth
        .clients
        .iter()
        .map(|client| client.provider.as_str())
        .collect();
    print_sub_task(
        "OAuth providers",
        &if providers.is_empty() { "none".to_string() } else { providers.join(", ") },
    );
    println!();
}
