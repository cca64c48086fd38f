// Build script for sso-service
// Compiles auth_service.proto for gRPC server and client code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/auth_service.proto");

    // Client code is generated as well so integration tests and relying
    // services can talk to the Auth service with the same types.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/auth_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile auth_service.proto for sso-service");
}
