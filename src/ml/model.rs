// ============================================================
// Layer 5 — Classifier Model
// ============================================================
// Transformer encoder with a linear classification head:
//
//   token ids ──► token + positional embeddings
//             ──► N × [masked self-attention → GELU FFN]
//             ──► layer norm
//             ──► first-token pooled vector
//             ──► linear head → one logit per category
//
// The encoder is its own Module so its weights can be restored
// from a pretrained record independently of the head, which is
// sized for this run's category count and always starts fresh.
//
// Padding positions are excluded from attention via the Bool
// pad mask produced by the batcher (true = padding).
//
// Reference: Vaswani et al. (2017), Devlin et al. (2019)

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

#[derive(Config, Debug)]
pub struct CommentClassifierConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub num_classes: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    pub dropout:     f64,
}

impl CommentClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CommentClassifier<B> {
        let encoder = self.init_encoder(device);
        let head    = LinearConfig::new(self.d_model, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        CommentClassifier { encoder, head, dropout }
    }

    fn init_encoder<B: Backend>(&self, device: &B::Device) -> CommentEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let blocks: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.init_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        CommentEncoder {
            token_embedding, position_embedding, blocks,
            final_norm, dropout,
            max_seq_len: self.max_seq_len,
            d_model:     self.d_model,
        }
    }

    fn init_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(pad_mask);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

// ─── Encoder ──────────────────────────────────────────────────────────────────
/// The fine-tunable encoder body. Standalone Module so a
/// pretrained CommentEncoderRecord can be loaded into it.
#[derive(Module, Debug)]
pub struct CommentEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub blocks:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
    pub d_model:            usize,
}

impl<B: Backend> CommentEncoder<B> {
    /// input_ids [batch, seq], pad_mask [batch, seq] →
    /// pooled representation [batch, d_model]
    pub fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        pad_mask:  Tensor<B, 2, Bool>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);

        // Self-attention is permutation-invariant, so position is
        // injected explicitly
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .reshape([1, seq_len])
            .repeat(0, batch_size);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for block in &self.blocks {
            x = block.forward(x, pad_mask.clone());
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]

        // First-token pooling: position 0 carries the [CLS] token
        // added by the pretrained tokenizer
        x.slice([0..batch_size, 0..1, 0..self.d_model])
            .reshape([batch_size, self.d_model])
    }
}

// ─── Classifier ───────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct CommentClassifier<B: Backend> {
    pub encoder: CommentEncoder<B>,
    pub head:    Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> CommentClassifier<B> {
    /// input_ids [batch, seq], pad_mask [batch, seq] →
    /// logits [batch, num_classes]
    pub fn forward(
        &self,
        input_ids: Tensor<B, 2, Int>,
        pad_mask:  Tensor<B, 2, Bool>,
    ) -> Tensor<B, 2> {
        let pooled = self.encoder.forward(input_ids, pad_mask);
        self.head.forward(self.dropout.forward(pooled))
    }

    /// Forward pass plus cross-entropy loss against class labels.
    pub fn forward_loss(
        &self,
        input_ids: Tensor<B, 2, Int>,
        pad_mask:  Tensor<B, 2, Bool>,
        labels:    Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(input_ids, pad_mask);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Replace the encoder weights with a pretrained record,
    /// keeping the freshly initialised head.
    pub fn load_encoder_record(self, record: CommentEncoderRecord<B>) -> Self {
        Self {
            encoder: self.encoder.load_record(record),
            head:    self.head,
            dropout: self.dropout,
        }
    }
}
