use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::{LoginInput, RegisterInput, VerifyInput};
use service::auth::notifier::recording::RecordingNotifier;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthConfig, AuthService};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let mail = Arc::new(RecordingNotifier::default());
    let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), hash_cost: 4 })
        .with_notifier(mail.clone());

    // pre-create and verify the user outside of the benchmark
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput {
        email: Some("bench@example.com".into()),
        name: Some("bencher".into()),
        address: Some("1 Bench Rd".into()),
        phone_number: Some("5550000".into()),
        password: Some("Benchmark1".into()),
        ..Default::default()
    }))
    .unwrap();
    let code = mail.last_for("bench@example.com").unwrap();
    rt.block_on(svc.verify(VerifyInput {
        base: Some(code.id.to_string()),
        secret: Some(code.secret.to_string()),
        ..Default::default()
    }))
    .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            rt.block_on(svc.login(LoginInput {
                email: Some("bench@example.com".into()),
                password: Some("Benchmark1".into()),
                ..Default::default()
            }))
            .unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
